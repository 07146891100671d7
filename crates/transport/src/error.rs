use ferry_common::EntityId;

/// Contract violations reported by boarding operations.
///
/// None of these leave the registry partially updated: an operation that
/// returns an error has changed nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("passenger {passenger} is already boarded on transport {transport}")]
    AlreadyBoarded {
        passenger: EntityId,
        transport: EntityId,
    },
    #[error("passenger {0} is not boarded on any transport")]
    NotBoarded(EntityId),
    #[error("transport {0} is not registered")]
    UnknownTransport(EntityId),
    #[error("entity {0} is already registered as a transport")]
    TransportExists(EntityId),
    #[error("transport {0} cannot board itself")]
    SelfBoarding(EntityId),
    #[error("transport {passenger} already carries transport {transport}")]
    BoardingCycle {
        passenger: EntityId,
        transport: EntityId,
    },
}
