//! Transports: moving entities that carry passengers.
//!
//! A passenger's pose is stored relative to its transport. Each world tick
//! the transport's own pose is read from the world, and on a throttled timer
//! every passenger's world pose is rederived and pushed back to the world.
//!
//! # Invariants
//! - A passenger is boarded on at most one transport.
//! - Membership entries never outlive their transport: removing a transport
//!   unboards all of its passengers first.
//! - Cached sin/cos are refreshed inside [`TransportBase::set_pose`], before
//!   any conversion can observe the new orientation.
//! - Unboarding a passenger that is not boarded is a no-op.

mod config;
mod error;
pub mod geometry;
mod passenger;
mod poses;
mod registry;
mod transport;

pub use config::{ConfigError, TransportConfig};
pub use error::TransportError;
pub use geometry::RotationFrame;
pub use passenger::PassengerRecord;
pub use poses::EntityPoses;
pub use registry::{TransportEvent, TransportRegistry, UnboardReason};
pub use transport::{TransportBase, TransportStats};
