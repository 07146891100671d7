use ferry_common::{EntityId, Pose};

/// A passenger's membership on a transport.
///
/// Owned by the transport's passenger map. `transport` is only an identity:
/// resolving it goes through [`TransportRegistry`](crate::TransportRegistry),
/// so a record can never keep a removed transport alive.
#[derive(Debug, Clone, PartialEq)]
pub struct PassengerRecord {
    passenger: EntityId,
    transport: EntityId,
    local: Pose,
}

impl PassengerRecord {
    pub(crate) fn new(passenger: EntityId, transport: EntityId, local: Pose) -> Self {
        Self {
            passenger,
            transport,
            local,
        }
    }

    /// Replace the stored local pose. The world pose follows on the next
    /// recompute pass.
    pub fn set_local_position(&mut self, local: Pose) {
        self.local = local;
    }

    pub fn passenger(&self) -> EntityId {
        self.passenger
    }

    /// Identity of the transport this passenger is on.
    pub fn transport_id(&self) -> EntityId {
        self.transport
    }

    pub fn local_pose(&self) -> Pose {
        self.local
    }

    pub fn local_x(&self) -> f32 {
        self.local.x()
    }

    pub fn local_y(&self) -> f32 {
        self.local.y()
    }

    pub fn local_z(&self) -> f32 {
        self.local.z()
    }

    pub fn local_orientation(&self) -> f32 {
        self.local.o()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_local_position_only_touches_local_pose() {
        let passenger = EntityId::new();
        let transport = EntityId::new();
        let mut record = PassengerRecord::new(passenger, transport, Pose::new(1.0, 2.0, 3.0, 0.5));

        record.set_local_position(Pose::new(-4.0, 0.0, 1.0, 6.0));

        assert_eq!(record.passenger(), passenger);
        assert_eq!(record.transport_id(), transport);
        assert_eq!(
            (record.local_x(), record.local_y(), record.local_z()),
            (-4.0, 0.0, 1.0)
        );
        assert_eq!(record.local_orientation(), 6.0);
    }
}
