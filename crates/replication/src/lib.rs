//! Replication strategies for consistent hashing.
//!
//! This crate decides which nodes hold the copies of a key:
//! - How many replicas to place
//! - Which distinct nodes receive them, walking the ring from the key
//! - Whether falling short of the replication factor is an error
//!
//! Placement is computed, never applied: moving data is up to the caller.

pub mod error;
pub mod placement;
pub mod strategy;

pub use corelib::Direction;
pub use error::{ReplicationError, Result};
pub use placement::{Replica, ReplicaPlacement};
pub use strategy::{ReplicationStrategy, SimpleStrategy};
