//! Simple replication strategy.
//!
//! Places N replicas on consecutive distinct nodes around the ring, starting
//! from the node that owns the key. Weighted nodes own several virtual slots,
//! so repeated owners are skipped and each node appears at most once.
//!
//! The walk runs clockwise by default or counter-clockwise on request. A
//! lenient strategy returns every distinct node it found when the ring is too
//! small; a strict one reports [`ReplicationError::InsufficientNodes`].
//!
//! # Algorithm
//!
//! 1. Resolve the primary: first slot at or after the key's hash
//! 2. Step slot by slot in the configured direction, skipping nodes already chosen
//! 3. Stop at N nodes or after one full revolution
//!
//! # Performance
//!
//! - **Time**: O(log n + s) where n = slots and s = slots stepped over
//! - **Space**: O(r) for r replicas

use corelib::hasher::KeyHasher;
use corelib::{Direction, NodeManager};
use tracing::debug;

use crate::error::{ReplicationError, Result};
use crate::placement::{Replica, ReplicaPlacement};
use crate::strategy::ReplicationStrategy;

/// Simple replication strategy: N replicas on consecutive distinct nodes.
///
/// # Example
///
/// ```rust
/// use corelib::{Node, NodeManager};
/// use replication::{ReplicationStrategy, SimpleStrategy};
///
/// let manager = NodeManager::new(16);
/// for name in ["a", "b", "c", "d"] {
///     manager.add(Node::new(name, ())).unwrap();
/// }
///
/// let placement = SimpleStrategy::new(3).replicas_for_key(&manager, "my-key").unwrap();
/// assert_eq!(placement.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct SimpleStrategy {
    /// Number of replicas to create (including primary).
    replication_factor: usize,
    direction: Direction,
    /// Fail instead of returning fewer replicas than requested.
    strict: bool,
}

impl SimpleStrategy {
    /// Create a clockwise, lenient strategy placing `replication_factor`
    /// copies, primary included. A factor of 0 yields an empty placement.
    pub fn new(replication_factor: usize) -> Self {
        Self {
            replication_factor,
            direction: Direction::Clockwise,
            strict: false,
        }
    }

    /// Walk the ring in `direction` instead of clockwise.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Report [`ReplicationError::InsufficientNodes`] when the ring has fewer
    /// distinct nodes than the replication factor.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl Default for SimpleStrategy {
    /// Three replicas, clockwise, lenient.
    fn default() -> Self {
        Self::new(3)
    }
}

impl<T, H> ReplicationStrategy<T, H> for SimpleStrategy
where
    T: Clone,
    H: KeyHasher,
{
    fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    fn replicas_for_key(
        &self,
        manager: &NodeManager<T, H>,
        key: &str,
    ) -> Result<ReplicaPlacement<T>> {
        if self.replication_factor == 0 {
            return Ok(ReplicaPlacement::new(key, Vec::new()));
        }

        let slots = manager.find(key, self.replication_factor, self.direction);
        if slots.is_empty() {
            return Err(ReplicationError::EmptyRing);
        }
        if self.strict && slots.len() < self.replication_factor {
            return Err(ReplicationError::InsufficientNodes {
                wanted: self.replication_factor,
                available: slots.len(),
            });
        }

        let replicas: Vec<Replica<T>> = slots.into_iter().map(Replica::from).collect();
        debug!(key, replicas = replicas.len(), direction = ?self.direction, "placed replicas");
        Ok(ReplicaPlacement::new(key, replicas))
    }

    fn name(&self) -> &'static str {
        "SimpleStrategy"
    }
}
