use ferry_common::{EntityId, Pose};
use ferry_kernel::World;

/// Access to the world poses owned by the entity model.
///
/// Transports read their owner's pose through this and push computed
/// passenger poses back through it; they never store world poses themselves.
pub trait EntityPoses {
    /// Current world pose, or `None` if the entity is not in the world.
    fn pose_of(&self, id: EntityId) -> Option<Pose>;

    /// Set an entity's world pose. Returns `false` if the entity is not in the world.
    fn relocate(&mut self, id: EntityId, pose: Pose) -> bool;
}

impl EntityPoses for World {
    fn pose_of(&self, id: EntityId) -> Option<Pose> {
        World::pose_of(self, id)
    }

    fn relocate(&mut self, id: EntityId, pose: Pose) -> bool {
        self.set_pose(id, pose)
    }
}
