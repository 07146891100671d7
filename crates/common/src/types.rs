use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use uuid::Uuid;

/// Unique identifier for an entity in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wrap an angle in radians into `[0, 2π)`.
pub fn normalize_orientation(o: f32) -> f32 {
    let wrapped = o.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly TAU
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Position plus facing around the vertical (z) axis.
///
/// Used both for world poses and for poses local to a transport's frame.
/// The orientation is kept in `[0, 2π)` by every constructor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: f32,
}

impl Pose {
    pub fn new(x: f32, y: f32, z: f32, o: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            orientation: normalize_orientation(o),
        }
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn z(&self) -> f32 {
        self.position.z
    }

    pub fn o(&self) -> f32 {
        self.orientation
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: 0.0,
        }
    }
}

impl std::fmt::Display for Pose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.3}, {:.3}, {:.3}, o={:.4})",
            self.position.x, self.position.y, self.position.z, self.orientation
        )
    }
}
