use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use ferry_common::{EntityId, Pose};
use ferry_kernel::World;
use ferry_transport::{RotationFrame, TransportConfig, TransportRegistry, geometry};
use glam::Vec2;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ferry-cli", about = "CLI tool for transport passenger simulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON transport config (defaults apply to missing fields)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and effective transport config
    Info,
    /// Sail a ship with passengers aboard and report their world poses
    Voyage {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "40")]
        ticks: u64,
        /// Tick length in milliseconds
        #[arg(long, default_value = "100")]
        tick_ms: u64,
        /// Passengers boarded in a ring on deck
        #[arg(short, long, default_value = "4")]
        passengers: usize,
        /// Ship forward speed in units per second
        #[arg(long, default_value = "7.0")]
        speed: f32,
        /// Ship turn rate in degrees per second
        #[arg(long, default_value = "15.0", allow_negative_numbers = true)]
        turn_rate: f32,
    },
    /// Convert one local pose to a world pose for a transport pose
    Locate {
        /// Transport pose: x y z o (radians)
        #[arg(
            long,
            num_args = 4,
            value_names = ["X", "Y", "Z", "O"],
            allow_negative_numbers = true
        )]
        transport: Vec<f32>,
        /// Local pose on the transport: x y z o (radians)
        #[arg(
            long,
            num_args = 4,
            value_names = ["X", "Y", "Z", "O"],
            allow_negative_numbers = true
        )]
        local: Vec<f32>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => TransportConfig::from_json_file(path)?,
        None => TransportConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("ferry-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "position_update_interval_ms={} orientation_epsilon={}",
                config.position_update_interval_ms, config.orientation_epsilon
            );
        }
        Commands::Voyage {
            ticks,
            tick_ms,
            passengers,
            speed,
            turn_rate,
        } => voyage(config, ticks, tick_ms, passengers, speed, turn_rate)?,
        Commands::Locate { transport, local } => {
            let transport = pose_from(&transport)?;
            let local = pose_from(&local)?;
            let frame = RotationFrame::new(transport.orientation);
            let rotated = frame.rotate_local_position(Vec2::new(local.x(), local.y()));
            let global = geometry::calculate_global_position_of(&transport, &frame, &local);
            println!("transport: {transport}");
            println!("local:     {local}");
            println!("rotated:   ({:.3}, {:.3})", rotated.x, rotated.y);
            println!("world:     {global}");
        }
    }

    Ok(())
}

fn pose_from(values: &[f32]) -> anyhow::Result<Pose> {
    match values {
        [x, y, z, o] => Ok(Pose::new(*x, *y, *z, *o)),
        _ => anyhow::bail!("expected 4 values (x y z o), got {}", values.len()),
    }
}

fn voyage(
    config: TransportConfig,
    ticks: u64,
    tick_ms: u64,
    passenger_count: usize,
    speed: f32,
    turn_rate_deg: f32,
) -> anyhow::Result<()> {
    let dt = Duration::from_millis(tick_ms);
    let turn_rate = turn_rate_deg.to_radians();

    let mut world = World::new();
    let mut registry = TransportRegistry::new(config);
    println!(
        "Voyage: ticks={ticks}, tick={tick_ms}ms, passengers={passenger_count}, interval={}ms",
        registry.config().position_update_interval_ms
    );

    let mut ship_pose = Pose::new(0.0, 0.0, 0.0, 0.0);
    let ship = world.spawn(ship_pose);
    registry.add_transport(ship, ship_pose)?;

    let mut aboard: Vec<EntityId> = Vec::with_capacity(passenger_count);
    for i in 0..passenger_count {
        let angle = i as f32 / passenger_count as f32 * std::f32::consts::TAU;
        let local = Pose::new(4.0 * angle.cos(), 4.0 * angle.sin(), 1.0, angle);
        let start = registry
            .transport(ship)
            .map_or(local, |t| t.calculate_global_position_of(&local));
        let passenger = world.spawn(start);
        registry.board_passenger(ship, passenger, local)?;
        aboard.push(passenger);
    }

    let mut passes = 0;
    for tick in 0..ticks {
        let secs = dt.as_secs_f32();
        let heading = ship_pose.orientation + turn_rate * secs;
        let forward = Vec2::from_angle(ship_pose.orientation) * speed * secs;
        ship_pose = Pose::new(
            ship_pose.x() + forward.x,
            ship_pose.y() + forward.y,
            ship_pose.z(),
            heading,
        );
        world.set_pose(ship, ship_pose);

        // Halfway through, the first passenger walks to the bow.
        if tick == ticks / 2 {
            if let Some(&walker) = aboard.first() {
                registry.set_local_position(walker, Pose::new(8.0, 0.0, 1.0, 0.0))?;
                tracing::info!(passenger = %walker, "passenger walked to the bow");
            }
        }

        passes += registry.update(dt, &mut world);
        world.step();
    }

    println!("Ship: {ship_pose} after {} ticks, {passes} recompute passes", world.tick());
    if let Some(transport) = registry.transport(ship) {
        for info in transport.passengers() {
            let passenger = info.passenger();
            let reported = world.pose_of(passenger).unwrap_or_default();
            let exact = transport.calculate_global_position_of(&info.local_pose());
            let lag = (reported.position - exact.position).length();
            println!(
                "  {passenger}: local={} world={reported} lag={lag:.3}",
                info.local_pose()
            );
        }
    }

    let unboarded = registry.remove_transport(ship);
    world.despawn(ship);
    println!(
        "Ship removed: {} passengers unboarded, {} membership events",
        unboarded.len(),
        registry.drain_events().len()
    );

    Ok(())
}
