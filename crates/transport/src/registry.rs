use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use ferry_common::{EntityId, Pose};
use serde::{Deserialize, Serialize};

use crate::config::TransportConfig;
use crate::error::TransportError;
use crate::passenger::PassengerRecord;
use crate::poses::EntityPoses;
use crate::transport::TransportBase;

/// Why a membership entry was destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnboardReason {
    /// The passenger left the transport.
    Requested,
    /// The transport was removed and took its passengers off with it.
    TransportRemoved,
    /// The passenger left the world.
    PassengerRemoved,
}

/// An event record produced by every membership change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransportEvent {
    TransportAdded {
        transport: EntityId,
        pose: Pose,
    },
    /// Transport removed. `passengers` were unboarded with it.
    TransportRemoved {
        transport: EntityId,
        passengers: usize,
    },
    Boarded {
        passenger: EntityId,
        transport: EntityId,
        local: Pose,
    },
    Unboarded {
        passenger: EntityId,
        transport: EntityId,
        reason: UnboardReason,
    },
}

/// Every transport in one world instance, plus the passenger → transport
/// index that keeps each passenger on at most one transport.
///
/// All membership mutation goes through here. Transports are keyed by their
/// owner entity and iterated in deterministic (BTreeMap) order.
#[derive(Debug, Default)]
pub struct TransportRegistry {
    config: TransportConfig,
    transports: BTreeMap<EntityId, TransportBase>,
    boarded_on: HashMap<EntityId, EntityId>,
    event_log: Vec<TransportEvent>,
}

impl TransportRegistry {
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Start tracking `owner` as a transport currently at `pose`.
    pub fn add_transport(
        &mut self,
        owner: EntityId,
        pose: Pose,
    ) -> Result<&mut TransportBase, TransportError> {
        if self.transports.contains_key(&owner) {
            return Err(TransportError::TransportExists(owner));
        }
        tracing::debug!(transport = %owner, %pose, "transport added");
        self.event_log.push(TransportEvent::TransportAdded {
            transport: owner,
            pose,
        });
        let base = TransportBase::new(owner, pose, &self.config);
        Ok(self.transports.entry(owner).or_insert(base))
    }

    /// Stop tracking a transport, unboarding all of its passengers first.
    /// Returns the passengers that were taken off. Unknown transports yield
    /// an empty list.
    pub fn remove_transport(&mut self, owner: EntityId) -> Vec<EntityId> {
        let Some(mut base) = self.transports.remove(&owner) else {
            return Vec::new();
        };
        let unboarded: Vec<EntityId> = base
            .unboard_all()
            .into_iter()
            .map(|record| record.passenger())
            .collect();
        for passenger in &unboarded {
            self.boarded_on.remove(passenger);
            self.event_log.push(TransportEvent::Unboarded {
                passenger: *passenger,
                transport: owner,
                reason: UnboardReason::TransportRemoved,
            });
        }
        self.event_log.push(TransportEvent::TransportRemoved {
            transport: owner,
            passengers: unboarded.len(),
        });
        tracing::debug!(transport = %owner, passengers = unboarded.len(), "transport removed");
        unboarded
    }

    pub fn transport(&self, owner: EntityId) -> Option<&TransportBase> {
        self.transports.get(&owner)
    }

    /// Mutable access for movement code (e.g. [`TransportBase::set_pose`]).
    pub fn transport_mut(&mut self, owner: EntityId) -> Option<&mut TransportBase> {
        self.transports.get_mut(&owner)
    }

    pub fn transports(&self) -> impl Iterator<Item = &TransportBase> {
        self.transports.values()
    }

    pub fn transport_count(&self) -> usize {
        self.transports.len()
    }

    /// Total passengers across all transports.
    pub fn passenger_count(&self) -> usize {
        self.boarded_on.len()
    }

    /// Board `passenger` onto `transport` at the given local pose.
    ///
    /// No world pose is pushed here; the first one comes with the next
    /// recompute pass or an explicit [`update_global_position_of`].
    ///
    /// [`update_global_position_of`]: Self::update_global_position_of
    pub fn board_passenger(
        &mut self,
        transport: EntityId,
        passenger: EntityId,
        local: Pose,
    ) -> Result<(), TransportError> {
        if passenger == transport {
            return Err(TransportError::SelfBoarding(transport));
        }
        if let Some(&current) = self.boarded_on.get(&passenger) {
            tracing::warn!(
                %passenger,
                %current,
                requested = %transport,
                "rejected double boarding"
            );
            return Err(TransportError::AlreadyBoarded {
                passenger,
                transport: current,
            });
        }
        if self.carriers_of(transport).any(|carrier| carrier == passenger) {
            return Err(TransportError::BoardingCycle {
                passenger,
                transport,
            });
        }
        let base = self
            .transports
            .get_mut(&transport)
            .ok_or(TransportError::UnknownTransport(transport))?;
        base.board_passenger(passenger, local)?;

        self.boarded_on.insert(passenger, transport);
        self.event_log.push(TransportEvent::Boarded {
            passenger,
            transport,
            local,
        });
        tracing::debug!(%passenger, %transport, %local, "passenger boarded");
        Ok(())
    }

    /// Board `passenger` at the local pose that corresponds to its current
    /// world pose `world`. Returns that local pose.
    pub fn board_at_world_pose(
        &mut self,
        transport: EntityId,
        passenger: EntityId,
        world: Pose,
    ) -> Result<Pose, TransportError> {
        let local = self
            .transports
            .get(&transport)
            .ok_or(TransportError::UnknownTransport(transport))?
            .calculate_local_position_of(&world);
        self.board_passenger(transport, passenger, local)?;
        Ok(local)
    }

    /// Take `passenger` off whatever transport it is on. Returns whether it
    /// was boarded; calling this for a passenger that is not boarded is a no-op.
    pub fn unboard_passenger(&mut self, passenger: EntityId) -> bool {
        self.unboard(passenger, UnboardReason::Requested)
    }

    fn unboard(&mut self, passenger: EntityId, reason: UnboardReason) -> bool {
        let Some(transport) = self.boarded_on.remove(&passenger) else {
            return false;
        };
        if let Some(base) = self.transports.get_mut(&transport) {
            base.unboard_passenger(passenger);
        }
        self.event_log.push(TransportEvent::Unboarded {
            passenger,
            transport,
            reason,
        });
        tracing::debug!(%passenger, %transport, ?reason, "passenger unboarded");
        true
    }

    /// Entity destroyed or left the world: drop it as a transport (with all
    /// its passengers) and as a passenger. Returns how many membership
    /// entries were destroyed.
    pub fn forget_entity(&mut self, id: EntityId) -> usize {
        let mut destroyed = self.remove_transport(id).len();
        if self.unboard(id, UnboardReason::PassengerRemoved) {
            destroyed += 1;
        }
        destroyed
    }

    /// Replace a passenger's stored local pose (e.g. it walked on deck).
    pub fn set_local_position(
        &mut self,
        passenger: EntityId,
        local: Pose,
    ) -> Result<(), TransportError> {
        self.record_mut(passenger)?.set_local_position(local);
        Ok(())
    }

    fn record_mut(&mut self, passenger: EntityId) -> Result<&mut PassengerRecord, TransportError> {
        let transport = self
            .boarded_on
            .get(&passenger)
            .ok_or(TransportError::NotBoarded(passenger))?;
        self.transports
            .get_mut(transport)
            .and_then(|base| base.passenger_mut(passenger))
            .ok_or(TransportError::NotBoarded(passenger))
    }

    pub fn is_boarded(&self, passenger: EntityId) -> bool {
        self.boarded_on.contains_key(&passenger)
    }

    /// Membership entry of a boarded passenger.
    pub fn passenger_info(&self, passenger: EntityId) -> Option<&PassengerRecord> {
        self.transport_of(passenger)?.passenger(passenger)
    }

    /// The transport a passenger is on.
    pub fn transport_of(&self, passenger: EntityId) -> Option<&TransportBase> {
        let transport = self.boarded_on.get(&passenger)?;
        self.transports.get(transport)
    }

    /// Current world pose of the transport a passenger is on.
    pub fn transport_pose_of(&self, passenger: EntityId) -> Option<Pose> {
        self.transport_of(passenger).map(TransportBase::pose)
    }

    /// Push one passenger's world pose now, from its stored local pose.
    pub fn update_global_position_of(
        &self,
        passenger: EntityId,
        poses: &mut impl EntityPoses,
    ) -> Result<Option<Pose>, TransportError> {
        let base = self
            .transport_of(passenger)
            .ok_or(TransportError::NotBoarded(passenger))?;
        let local = base
            .passenger(passenger)
            .ok_or(TransportError::NotBoarded(passenger))?
            .local_pose();
        Ok(base.update_global_position_of(passenger, &local, poses))
    }

    /// Unthrottled recompute of every passenger on every transport. Returns
    /// how many passengers were relocated.
    pub fn update_global_positions(&mut self, poses: &mut impl EntityPoses) -> usize {
        self.transports
            .values_mut()
            .map(|base| base.update_global_positions(&mut *poses))
            .sum()
    }

    /// Per-tick driver: pull each transport's current pose from the world,
    /// then advance its recompute timer. Returns how many transports ran a
    /// recompute pass.
    ///
    /// Call after transport movement for the tick has been applied.
    pub fn update(&mut self, diff: Duration, poses: &mut impl EntityPoses) -> usize {
        let _span = tracing::info_span!("transport_update").entered();
        let mut passes = 0;
        for owner in self.update_order() {
            let Some(base) = self.transports.get_mut(&owner) else {
                continue;
            };
            let Some(pose) = poses.pose_of(owner) else {
                tracing::warn!(transport = %owner, "transport owner not in world, skipping");
                continue;
            };
            base.set_pose(pose);
            if base.update(diff, poses) {
                passes += 1;
            }
        }
        tracing::trace!(transports = self.transports.len(), passes, "transport update complete");
        passes
    }

    /// Transports ordered so every carrier comes before the transports riding
    /// on it; ties keep id order.
    fn update_order(&self) -> Vec<EntityId> {
        let mut order: Vec<EntityId> = self.transports.keys().copied().collect();
        order.sort_by_cached_key(|owner| self.carriers_of(*owner).count());
        order
    }

    /// Chain of transports carrying `id`, innermost first. Finite because
    /// boarding rejects cycles.
    fn carriers_of(&self, id: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        std::iter::successors(self.boarded_on.get(&id).copied(), |carrier| {
            self.boarded_on.get(carrier).copied()
        })
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[TransportEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<TransportEvent> {
        std::mem::take(&mut self.event_log)
    }
}
