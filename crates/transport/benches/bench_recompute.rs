use std::hint::black_box;
use std::time::{Duration, Instant};

use ferry_common::{EntityId, Pose};
use ferry_kernel::World;
use ferry_transport::{TransportConfig, TransportRegistry};

fn make_ship(passenger_count: usize) -> (World, TransportRegistry, EntityId) {
    let mut world = World::new();
    let mut registry = TransportRegistry::new(TransportConfig::default());
    let ship_pose = Pose::new(0.0, 0.0, 0.0, 0.0);
    let ship = world.spawn(ship_pose);
    if let Err(err) = registry.add_transport(ship, ship_pose) {
        panic!("failed to add transport: {err}");
    }
    for i in 0..passenger_count {
        let passenger = world.spawn(Pose::default());
        let local = Pose::new((i % 40) as f32 * 0.5, (i / 40) as f32 * 0.5, 1.0, 0.0);
        if let Err(err) = registry.board_passenger(ship, passenger, local) {
            panic!("failed to board passenger: {err}");
        }
    }
    (world, registry, ship)
}

fn bench_recompute_pass(passenger_count: usize, iterations: usize) {
    let (mut world, mut registry, ship) = make_ship(passenger_count);

    let start = Instant::now();
    for i in 0..iterations {
        world.set_pose(ship, Pose::new(i as f32, 0.0, 0.0, i as f32 * 0.01));
        registry.update(Duration::ZERO, &mut world);
        black_box(registry.update_global_positions(black_box(&mut world)));
        world.drain_events();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  recompute ({passenger_count} passengers, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_throttled_ticks(passenger_count: usize, iterations: usize) {
    let (mut world, mut registry, ship) = make_ship(passenger_count);

    let start = Instant::now();
    for i in 0..iterations {
        world.set_pose(ship, Pose::new(i as f32 * 0.1, 0.0, 0.0, i as f32 * 0.001));
        black_box(registry.update(black_box(Duration::from_millis(50)), &mut world));
        world.drain_events();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  throttled tick ({passenger_count} passengers, {iterations} ticks @50ms): {per_iter:?}/tick, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Transport Recompute Benchmarks ===\n");

    println!("Unthrottled recompute pass:");
    bench_recompute_pass(10, 10000);
    bench_recompute_pass(100, 1000);
    bench_recompute_pass(1000, 100);

    println!("\nThrottled world ticks:");
    bench_throttled_ticks(10, 10000);
    bench_throttled_ticks(100, 10000);
    bench_throttled_ticks(1000, 1000);

    println!("\n=== Done ===");
}
