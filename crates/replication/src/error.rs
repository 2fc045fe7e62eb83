//! Replication error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReplicationError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplicationError {
    /// No node is placed on the ring.
    #[error("cannot place replicas: the ring is empty")]
    EmptyRing,
    /// Fewer distinct nodes than the replication factor (strict mode only).
    #[error("wanted {wanted} replicas but only {available} distinct nodes are available")]
    InsufficientNodes { wanted: usize, available: usize },
}
