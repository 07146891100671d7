use std::collections::BTreeMap;
use std::time::Duration;

use ferry_common::{EntityId, Pose};
use glam::Vec2;

use crate::config::TransportConfig;
use crate::error::TransportError;
use crate::geometry::{self, RotationFrame};
use crate::passenger::PassengerRecord;
use crate::poses::EntityPoses;

/// Recompute counters for instrumentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportStats {
    pub recompute_passes: u64,
    pub relocated_last_pass: usize,
    pub trig_refreshes: u64,
}

/// Passenger bookkeeping for one transport entity.
///
/// Holds the boarded passengers with their local poses, the transport's
/// current world pose with its cached sin/cos, and the timer that throttles
/// world-pose recomputation. Membership changes go through
/// [`TransportRegistry`](crate::TransportRegistry), which also guarantees a
/// passenger is on at most one transport.
#[derive(Debug)]
pub struct TransportBase {
    owner: EntityId,
    pose: Pose,
    frame: RotationFrame,
    passengers: BTreeMap<EntityId, PassengerRecord>,
    update_interval: Duration,
    orientation_epsilon: f32,
    update_timer: Duration,
    stats: TransportStats,
}

impl TransportBase {
    pub fn new(owner: EntityId, pose: Pose, config: &TransportConfig) -> Self {
        Self {
            owner,
            pose,
            frame: RotationFrame::new(pose.orientation),
            passengers: BTreeMap::new(),
            update_interval: config.position_update_interval(),
            orientation_epsilon: config.orientation_epsilon,
            update_timer: Duration::ZERO,
            stats: TransportStats::default(),
        }
    }

    /// The transport entity itself.
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    /// Current world pose of the transport.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn frame(&self) -> &RotationFrame {
        &self.frame
    }

    pub fn stats(&self) -> &TransportStats {
        &self.stats
    }

    /// Accumulated time since the last recompute pass.
    pub fn pending_time(&self) -> Duration {
        self.update_timer
    }

    /// Move the transport. The trig cache is refreshed here so that every
    /// later conversion sees the new orientation.
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
        if self.frame.refresh(pose.orientation, self.orientation_epsilon) {
            self.stats.trig_refreshes += 1;
        }
    }

    /// Advance the recompute timer. Runs [`update_global_positions`] once the
    /// accumulated time reaches the configured interval and returns whether
    /// it did.
    ///
    /// [`update_global_positions`]: Self::update_global_positions
    pub fn update(&mut self, diff: Duration, poses: &mut impl EntityPoses) -> bool {
        self.update_timer = self.update_timer.saturating_add(diff);
        if self.update_timer < self.update_interval {
            return false;
        }
        self.update_timer = Duration::ZERO;
        self.update_global_positions(poses);
        true
    }

    /// Push a fresh world pose for every passenger. Returns how many the
    /// entity model accepted.
    pub fn update_global_positions(&mut self, poses: &mut impl EntityPoses) -> usize {
        let mut relocated = 0;
        for record in self.passengers.values() {
            if self
                .update_global_position_of(record.passenger(), &record.local_pose(), poses)
                .is_some()
            {
                relocated += 1;
            }
        }
        self.stats.recompute_passes += 1;
        self.stats.relocated_last_pass = relocated;
        tracing::trace!(
            transport = %self.owner,
            passengers = self.passengers.len(),
            relocated,
            "recomputed passenger world poses"
        );
        relocated
    }

    /// Compute the world pose for `local` and hand it to the entity model as
    /// `passenger`'s pose. The stored local pose is left untouched.
    ///
    /// Returns the pose pushed, or `None` if the passenger is not in the world.
    pub fn update_global_position_of(
        &self,
        passenger: EntityId,
        local: &Pose,
        poses: &mut impl EntityPoses,
    ) -> Option<Pose> {
        let global = self.calculate_global_position_of(local);
        if poses.relocate(passenger, global) {
            Some(global)
        } else {
            tracing::warn!(
                %passenger,
                transport = %self.owner,
                "passenger not in world, pose dropped"
            );
            None
        }
    }

    pub fn rotate_local_position(&self, local: Vec2) -> Vec2 {
        self.frame.rotate_local_position(local)
    }

    pub fn normalize_rotated_position(&self, rotated: Vec2) -> Vec2 {
        self.frame.normalize_rotated_position(rotated)
    }

    pub fn calculate_global_position_of(&self, local: &Pose) -> Pose {
        geometry::calculate_global_position_of(&self.pose, &self.frame, local)
    }

    pub fn calculate_local_position_of(&self, world: &Pose) -> Pose {
        geometry::calculate_local_position_of(&self.pose, &self.frame, world)
    }

    pub fn passenger(&self, passenger: EntityId) -> Option<&PassengerRecord> {
        self.passengers.get(&passenger)
    }

    pub fn has_passenger(&self, passenger: EntityId) -> bool {
        self.passengers.contains_key(&passenger)
    }

    pub fn passenger_count(&self) -> usize {
        self.passengers.len()
    }

    pub fn passengers(&self) -> impl Iterator<Item = &PassengerRecord> {
        self.passengers.values()
    }

    pub(crate) fn passenger_mut(&mut self, passenger: EntityId) -> Option<&mut PassengerRecord> {
        self.passengers.get_mut(&passenger)
    }

    pub(crate) fn board_passenger(
        &mut self,
        passenger: EntityId,
        local: Pose,
    ) -> Result<&PassengerRecord, TransportError> {
        if self.passengers.contains_key(&passenger) {
            return Err(TransportError::AlreadyBoarded {
                passenger,
                transport: self.owner,
            });
        }
        let record = PassengerRecord::new(passenger, self.owner, local);
        Ok(self.passengers.entry(passenger).or_insert(record))
    }

    pub(crate) fn unboard_passenger(&mut self, passenger: EntityId) -> Option<PassengerRecord> {
        self.passengers.remove(&passenger)
    }

    /// Remove every membership entry at once.
    pub(crate) fn unboard_all(&mut self) -> Vec<PassengerRecord> {
        std::mem::take(&mut self.passengers).into_values().collect()
    }
}
