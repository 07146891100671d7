//! Shared types for the ferry workspace: entity identity and world/local poses.

mod types;

pub use types::{EntityId, Pose, normalize_orientation};
