//! Replication strategy abstractions.
//!
//! A strategy turns a key into an ordered list of distinct nodes. The
//! built-in [`SimpleStrategy`] walks the ring from the key's owner, in
//! either direction, collecting nodes until the replication factor is met.

pub mod simple;

pub use simple::SimpleStrategy;

use corelib::hasher::{Crc32, KeyHasher};
use corelib::NodeManager;

use crate::error::Result;
use crate::placement::ReplicaPlacement;

/// Trait for replication strategies.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (Send + Sync) as they may be
/// shared across threads.
pub trait ReplicationStrategy<T, H: KeyHasher = Crc32>: Send + Sync + 'static {
    /// Number of copies this strategy places, primary included.
    fn replication_factor(&self) -> usize;

    /// Find replica nodes for a given key.
    ///
    /// # Arguments
    /// * `manager` - The node manager to query
    /// * `key` - The key to find replicas for
    ///
    /// # Returns
    /// Distinct nodes, primary first
    fn replicas_for_key(
        &self,
        manager: &NodeManager<T, H>,
        key: &str,
    ) -> Result<ReplicaPlacement<T>>;

    /// Get the strategy name (for logging/debugging).
    fn name(&self) -> &'static str;
}
