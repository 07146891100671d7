use ferry_common::{EntityId, Pose};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An event record produced by every mutation to the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WorldEvent {
    /// Entity entered the world at the given pose.
    Spawned { id: EntityId, pose: Pose },
    /// Entity left the world. Carries its last pose.
    Despawned { id: EntityId, pose: Pose },
    /// Entity world pose was changed.
    Relocated { id: EntityId, old: Pose, new: Pose },
    /// Simulation advanced one tick.
    Stepped { tick: u64 },
}

/// The authoritative world state.
///
/// The kernel owns every entity's world pose. Transports and movement code
/// compute poses and hand them back through [`World::set_pose`].
///
/// Uses BTreeMap for deterministic iteration order across all platforms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    entities: BTreeMap<EntityId, EntityData>,
    tick: u64,
    /// Append-only event log of all mutations.
    #[serde(skip)]
    event_log: Vec<WorldEvent>,
}

/// Per-entity data stored in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityData {
    pub pose: Pose,
}

impl World {
    /// Create an empty world at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Number of entities in the world.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Read-only access to all entities.
    pub fn entities(&self) -> &BTreeMap<EntityId, EntityData> {
        &self.entities
    }

    /// Spawn a new entity at the given pose. Returns its id.
    pub fn spawn(&mut self, pose: Pose) -> EntityId {
        let id = EntityId::new();
        self.spawn_with_id(id, pose);
        id
    }

    /// Spawn an entity with a specific id.
    pub fn spawn_with_id(&mut self, id: EntityId, pose: Pose) {
        self.entities.insert(id, EntityData { pose });
        self.event_log.push(WorldEvent::Spawned { id, pose });
        tracing::trace!(%id, %pose, "entity spawned");
    }

    /// Remove an entity. Returns the data if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityData> {
        let data = self.entities.remove(&id);
        if let Some(ref d) = data {
            self.event_log
                .push(WorldEvent::Despawned { id, pose: d.pose });
            tracing::trace!(%id, "entity despawned");
        }
        data
    }

    /// Whether the entity is currently in the world.
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Current world pose of an entity.
    pub fn pose_of(&self, id: EntityId) -> Option<Pose> {
        self.entities.get(&id).map(|d| d.pose)
    }

    /// Update an entity's world pose and log the change.
    pub fn set_pose(&mut self, id: EntityId, new: Pose) -> bool {
        if let Some(data) = self.entities.get_mut(&id) {
            let old = data.pose;
            data.pose = new;
            self.event_log.push(WorldEvent::Relocated { id, old, new });
            true
        } else {
            false
        }
    }

    /// Advance the simulation by one tick.
    pub fn step(&mut self) {
        self.tick += 1;
        self.event_log.push(WorldEvent::Stepped { tick: self.tick });
    }
}
