//! World Kernel: authoritative entity poses and simulation stepping.
//!
//! # Invariants
//! - Entity world poses are owned here; other crates only compute and forward them.
//! - All state mutations flow through explicit operations and are logged.

pub mod world;

pub use world::{EntityData, World, WorldEvent};
