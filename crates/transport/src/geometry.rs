//! Conversion between a transport's local frame and world space.
//!
//! Rotation happens in the horizontal (x, y) plane only; z is a plain offset.

use ferry_common::{Pose, normalize_orientation};
use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// Shortest angular distance between two orientations, in `[0, π]`.
pub fn angular_distance(a: f32, b: f32) -> f32 {
    let d = normalize_orientation(a - b);
    d.min(TAU - d)
}

/// Cached sine/cosine of a transport's orientation.
///
/// Stored as the unit vector `(cos o, sin o)` so rotation is a single complex
/// multiplication.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationFrame {
    orientation: f32,
    rotation: Vec2,
}

impl RotationFrame {
    pub fn new(orientation: f32) -> Self {
        let orientation = normalize_orientation(orientation);
        let (sin_o, cos_o) = orientation.sin_cos();
        Self {
            orientation,
            rotation: Vec2::new(cos_o, sin_o),
        }
    }

    /// Orientation the cached values were computed for.
    pub fn orientation(&self) -> f32 {
        self.orientation
    }

    pub fn sin(&self) -> f32 {
        self.rotation.y
    }

    pub fn cos(&self) -> f32 {
        self.rotation.x
    }

    /// Recompute the cache if `orientation` moved more than `epsilon` away
    /// from the cached one. Returns whether a recompute happened.
    pub fn refresh(&mut self, orientation: f32, epsilon: f32) -> bool {
        if angular_distance(orientation, self.orientation) > epsilon {
            *self = Self::new(orientation);
            true
        } else {
            false
        }
    }

    /// Rotate a local offset into world-aligned axes, still relative to the
    /// transport origin.
    pub fn rotate_local_position(&self, local: Vec2) -> Vec2 {
        self.rotation.rotate(local)
    }

    /// Inverse of [`rotate_local_position`](Self::rotate_local_position).
    pub fn normalize_rotated_position(&self, rotated: Vec2) -> Vec2 {
        Vec2::new(self.rotation.x, -self.rotation.y).rotate(rotated)
    }
}

/// World pose implied by `local` on a transport at `transport` whose trig
/// cache is `frame`.
///
/// Global orientation is `normalize(transport.o + local.o)`.
pub fn calculate_global_position_of(transport: &Pose, frame: &RotationFrame, local: &Pose) -> Pose {
    let rotated = frame.rotate_local_position(local.position.truncate());
    Pose {
        position: transport.position + rotated.extend(local.position.z),
        orientation: normalize_orientation(transport.orientation + local.orientation),
    }
}

/// Local pose on a transport at `transport` that maps to the world pose `world`.
pub fn calculate_local_position_of(transport: &Pose, frame: &RotationFrame, world: &Pose) -> Pose {
    let offset: Vec3 = world.position - transport.position;
    let local = frame.normalize_rotated_position(offset.truncate());
    Pose {
        position: local.extend(offset.z),
        orientation: normalize_orientation(world.orientation - transport.orientation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPS: f32 = 1e-4;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn rotation_round_trip_is_identity() {
        let locals = [
            Vec2::new(5.0, 0.0),
            Vec2::new(-3.5, 12.25),
            Vec2::new(0.0, -7.0),
            Vec2::new(100.0, 100.0),
        ];
        for step in 0..16 {
            let frame = RotationFrame::new(step as f32 * TAU / 16.0 + 0.1);
            for local in locals {
                let back = frame.normalize_rotated_position(frame.rotate_local_position(local));
                assert!(close(back.x, local.x) && close(back.y, local.y), "{local} -> {back}");
            }
        }
    }

    #[test]
    fn quarter_turn_rotates_x_onto_y() {
        let frame = RotationFrame::new(FRAC_PI_2);
        let r = frame.rotate_local_position(Vec2::new(5.0, 0.0));
        assert!(close(r.x, 0.0));
        assert!(close(r.y, 5.0));
    }

    #[test]
    fn global_position_composes_rotation_and_translation() {
        let transport = Pose::new(10.0, -4.0, 2.0, 1.2);
        let frame = RotationFrame::new(transport.orientation);
        let local = Pose::new(3.0, 1.5, 0.75, 5.9);

        let global = calculate_global_position_of(&transport, &frame, &local);
        let rotated = frame.rotate_local_position(Vec2::new(3.0, 1.5));

        assert!(close(global.x(), rotated.x + 10.0));
        assert!(close(global.y(), rotated.y - 4.0));
        assert!(close(global.z(), 2.75));
        assert!(close(global.o(), normalize_orientation(1.2 + 5.9)));
        assert!(global.o() < TAU);
    }

    #[test]
    fn local_position_inverts_global_position() {
        let transport = Pose::new(-50.0, 20.0, 8.0, 4.0);
        let frame = RotationFrame::new(transport.orientation);
        let local = Pose::new(-2.0, 6.0, 1.0, 0.3);

        let global = calculate_global_position_of(&transport, &frame, &local);
        let back = calculate_local_position_of(&transport, &frame, &global);

        assert!(close(back.x(), local.x()));
        assert!(close(back.y(), local.y()));
        assert!(close(back.z(), local.z()));
        assert!(close(back.o(), local.o()));
    }

    #[test]
    fn refresh_ignores_changes_within_epsilon() {
        let mut frame = RotationFrame::new(1.0);
        assert!(!frame.refresh(1.0 + 1e-6, 1e-4));
        assert_eq!(frame.orientation(), 1.0);
        assert!(frame.refresh(1.5, 1e-4));
        assert!(close(frame.sin(), 1.5f32.sin()));
        assert!(close(frame.cos(), 1.5f32.cos()));
    }

    #[test]
    fn refresh_detects_small_backwards_turns() {
        let mut frame = RotationFrame::new(0.5);
        assert!(frame.refresh(0.49, 1e-4));
        assert!(close(frame.orientation(), 0.49));
    }

    #[test]
    fn angular_distance_wraps_around_zero() {
        assert!(close(angular_distance(0.05, TAU - 0.05), 0.1));
        assert!(close(angular_distance(0.0, PI), PI));
        assert_eq!(angular_distance(2.0, 2.0), 0.0);
    }
}
