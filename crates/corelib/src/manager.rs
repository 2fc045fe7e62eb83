//! Node manager: the thread-safe front of the ring.
//!
//! The manager owns the authoritative node records and one [`HashRing`].
//! Every node is expanded into `weight * replicas` virtual slots, and every
//! operation runs under a single reader/writer lock: lookups share it,
//! membership and weight changes take it exclusively.
//!
//! # Example
//!
//! ```rust
//! use corelib::{Node, NodeManager};
//!
//! let manager = NodeManager::new(10);
//! manager.add(Node::new("cache-a", "10.0.0.1")).unwrap();
//! manager.add(Node::new("cache-b", "10.0.0.2")).unwrap();
//!
//! let owner = manager.find_one("user:42").unwrap();
//! assert!(owner.owner() == "cache-a" || owner.owner() == "cache-b");
//! assert_eq!(manager.slots(), 20);
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::hasher::{Crc32, KeyHasher};
use crate::node::{check_weight, slot_count, virtual_key, Node};
use crate::ring::{HashRing, Position};
use crate::slot::Slot;

/// Direction of a chained lookup around the ring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Successors: increasing positions, wrapping to the smallest.
    #[default]
    Clockwise,
    /// Predecessors: decreasing positions, wrapping to the largest.
    CounterClockwise,
}

impl Direction {
    fn step<'a, T, H: KeyHasher>(self, position: &Position<'a, T, H>) -> Position<'a, T, H> {
        match self {
            Direction::Clockwise => position.next(),
            Direction::CounterClockwise => position.prev(),
        }
    }
}

/// State guarded by the manager's lock.
pub(crate) struct Registry<T, H: KeyHasher> {
    nodes: HashMap<String, Node<T, H>>,
    ring: HashRing<T, H>,
    replicas: usize,
}

impl<T: Clone, H: KeyHasher> Registry<T, H> {
    fn register(&mut self, node: Node<T, H>) -> Result<()> {
        let slots = node.virtuals(self.replicas)?;
        if let Some(previous) = self.nodes.remove(node.key()) {
            unregister_slots(&mut self.ring, &previous, self.replicas);
        }
        self.ring.insert(slots);
        self.nodes.insert(node.key().to_string(), node);
        Ok(())
    }

    fn unregister(&mut self, node_key: &str) -> Option<Node<T, H>> {
        let node = self.nodes.remove(node_key)?;
        unregister_slots(&mut self.ring, &node, self.replicas);
        Some(node)
    }

    /// Swap a managed node's virtual slots for `weight * replicas` new ones.
    /// Returns `Ok(false)` if `node_key` is not managed. The ring is left
    /// untouched when the new slot count is out of bounds.
    pub(crate) fn reweight(&mut self, node_key: &str, weight: usize) -> Result<bool> {
        let Some(node) = self.nodes.get_mut(node_key) else {
            return Ok(false);
        };
        slot_count(node_key, weight, self.replicas)?;

        let previous = node.weight();
        unregister_slots(&mut self.ring, node, self.replicas);
        node.set_weight_unchecked(weight);
        self.ring.insert(node.virtuals(self.replicas)?);

        debug!(
            node = node_key,
            previous,
            weight,
            slots = self.ring.count(),
            "reweighted node"
        );
        record_gauges(self);
        Ok(true)
    }
}

fn unregister_slots<T, H: KeyHasher>(
    ring: &mut HashRing<T, H>,
    node: &Node<T, H>,
    replicas: usize,
) {
    // Registered nodes passed the slot-count check when they were placed.
    let total = node.slot_count(replicas).unwrap_or_default();
    for index in 0..total {
        ring.remove_owned(&virtual_key(node.key(), index), node.key());
    }
}

fn record_gauges<T, H: KeyHasher>(registry: &Registry<T, H>) {
    metrics::gauge!("hashring_nodes").set(registry.nodes.len() as f64);
    metrics::gauge!("hashring_slots").set(registry.ring.count() as f64);
}

/// Thread-safe registry of nodes over a consistent hash ring.
///
/// Cloning the manager is cheap and yields another handle to the same ring.
pub struct NodeManager<T, H: KeyHasher = Crc32> {
    inner: Arc<RwLock<Registry<T, H>>>,
}

impl<T: Clone> NodeManager<T> {
    /// Create a manager using the default CRC-32 hasher.
    ///
    /// `replicas` is the number of virtual slots per unit of node weight and
    /// is fixed for the manager's lifetime. With `replicas == 0` nodes are
    /// tracked but never placed on the ring.
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas)
    }
}

impl<T: Clone, H: KeyHasher> NodeManager<T, H> {
    /// Create a manager using hasher `H`.
    pub fn with_hasher(replicas: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Registry {
                nodes: HashMap::new(),
                ring: HashRing::with_hasher(),
                replicas,
            })),
        }
    }

    /// Register `node` and place its virtual slots on the ring.
    ///
    /// A node with the same key is replaced, slots included. Fails with
    /// [`Error::TooManySlots`](crate::Error::TooManySlots) if the node would
    /// need more than [`MAX_SLOTS_PER_NODE`](crate::node::MAX_SLOTS_PER_NODE)
    /// slots; the ring and any previous record are then left unchanged.
    pub fn add(&self, mut node: Node<T, H>) -> Result<()> {
        node.attach(Arc::downgrade(&self.inner));
        let key = node.key().to_string();
        let weight = node.weight();

        let mut registry = self.inner.write();
        registry.register(node)?;
        debug!(node = %key, weight, slots = registry.ring.count(), "added node");
        record_gauges(&*registry);
        Ok(())
    }

    /// Remove a node and all of its virtual slots. Returns `false` if the
    /// node is not managed.
    pub fn remove(&self, node_key: &str) -> bool {
        let mut registry = self.inner.write();
        match registry.unregister(node_key) {
            Some(node) => {
                debug!(
                    node = node_key,
                    weight = node.weight(),
                    slots = registry.ring.count(),
                    "removed node"
                );
                record_gauges(&*registry);
                true
            }
            None => false,
        }
    }

    /// Change a managed node's weight. Returns `Ok(false)` if the node is
    /// not managed.
    pub fn set_weight(&self, node_key: &str, weight: usize) -> Result<bool> {
        check_weight(node_key, weight)?;
        self.inner.write().reweight(node_key, weight)
    }

    /// Look up a node by its key (not by ring position).
    pub fn get_node(&self, key: &str) -> Option<Node<T, H>> {
        self.inner.read().nodes.get(key).cloned()
    }

    /// Snapshot of all managed nodes, in no particular order.
    pub fn get_nodes(&self) -> Vec<Node<T, H>> {
        self.inner.read().nodes.values().cloned().collect()
    }

    /// The slot that owns `key`, or `None` if the ring is empty.
    pub fn find_one(&self, key: &str) -> Option<Slot<T>> {
        self.inner.read().ring.get(key).map(|position| position.slot().clone())
    }

    /// Up to `n` slots of distinct nodes, starting with the owner of `key`
    /// and following the ring clockwise.
    pub fn find_next(&self, key: &str, n: usize) -> Vec<Slot<T>> {
        self.find(key, n, Direction::Clockwise)
    }

    /// Up to `n` slots of distinct nodes, starting with the owner of `key`
    /// and following the ring counter-clockwise.
    pub fn find_prev(&self, key: &str, n: usize) -> Vec<Slot<T>> {
        self.find(key, n, Direction::CounterClockwise)
    }

    /// Chained lookup in either direction.
    ///
    /// Slots are de-duplicated by owning node, so the result never holds two
    /// slots of the same node and its length is at most
    /// `min(n, self.count())`. The walk visits each slot at most once.
    pub fn find(&self, key: &str, n: usize, direction: Direction) -> Vec<Slot<T>> {
        let registry = self.inner.read();
        let mut found = Vec::with_capacity(n.min(registry.nodes.len()));
        if n == 0 {
            return found;
        }
        let Some(mut cursor) = registry.ring.get(key) else {
            return found;
        };

        let mut seen = HashSet::new();
        for _ in 0..registry.ring.count() {
            if seen.insert(cursor.owner()) {
                found.push(cursor.slot().clone());
                if found.len() == n {
                    break;
                }
            }
            cursor = direction.step(&cursor);
        }
        found
    }

    /// Number of managed nodes.
    pub fn count(&self) -> usize {
        self.inner.read().nodes.len()
    }

    /// Number of slots on the ring; `Σ weight × replicas` barring hash
    /// collisions between virtual keys.
    pub fn slots(&self) -> usize {
        self.inner.read().ring.count()
    }

    pub fn replicas(&self) -> usize {
        self.inner.read().replicas
    }

    pub fn hasher_name(&self) -> &'static str {
        H::name()
    }

    /// Visit every ring slot in ascending order under the shared lock.
    pub fn for_each_slot<F>(&self, f: F)
    where
        F: FnMut(usize, u32, &T),
    {
        self.inner.read().ring.for_each(f);
    }
}

impl<T, H: KeyHasher> Clone for NodeManager<T, H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, H: KeyHasher> fmt::Debug for NodeManager<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.inner.read();
        f.debug_struct("NodeManager")
            .field("nodes", &registry.nodes.len())
            .field("slots", &registry.ring.count())
            .field("replicas", &registry.replicas)
            .field("hasher", &H::name())
            .finish()
    }
}
