//! Node abstractions for the consistent hash ring.
//!
//! A node is a logical participant (a shard, a cache server, a storage
//! backend) identified by a string key. On the ring it is represented by
//! `weight * replicas` virtual slots whose positions are derived from
//! [`virtual_key`].

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::hasher::{Crc32, KeyHasher};
use crate::manager::Registry;
use crate::slot::Slot;

/// Upper bound on the virtual slots a single node may place on the ring.
pub const MAX_SLOTS_PER_NODE: usize = 1 << 20;

/// Separator between a node key and a virtual slot index.
pub const VIRTUAL_KEY_SEPARATOR: char = '-';

/// Key of the `index`-th virtual slot of `node_key`, e.g. `"cache-a-3"`.
///
/// The index is written in canonical decimal and contains no separator, so
/// splitting at the last separator recovers `(node_key, index)`: two
/// different pairs never produce the same virtual key.
pub fn virtual_key(node_key: &str, index: usize) -> String {
    format!("{node_key}{VIRTUAL_KEY_SEPARATOR}{index}")
}

/// Logical node participating in the ring.
///
/// A `Node` obtained from [`NodeManager::get_node`](crate::NodeManager::get_node)
/// is a detached copy holding a non-owning handle to its manager. The handle
/// is only used by [`set_weight`](Self::set_weight) to re-register virtual
/// slots; the manager keeps the authoritative record.
pub struct Node<T, H: KeyHasher = Crc32> {
    key: String,
    weight: usize,
    data: T,
    manager: Option<Weak<RwLock<Registry<T, H>>>>,
}

impl<T, H: KeyHasher> Node<T, H> {
    /// Construct an unattached node with weight 1.
    pub fn new(key: impl Into<String>, data: T) -> Self {
        Self {
            key: key.into(),
            weight: 1,
            data,
            manager: None,
        }
    }

    /// Construct an unattached node with an explicit weight.
    pub fn with_weight(key: impl Into<String>, data: T, weight: usize) -> Result<Self> {
        let node = Self::new(key, data);
        check_weight(&node.key, weight)?;
        Ok(Self { weight, ..node })
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn weight(&self) -> usize {
        self.weight
    }

    #[inline]
    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    /// True while the node holds a handle to a live manager.
    pub fn is_attached(&self) -> bool {
        self.manager
            .as_ref()
            .is_some_and(|handle| handle.strong_count() > 0)
    }

    pub(crate) fn attach(&mut self, handle: Weak<RwLock<Registry<T, H>>>) {
        self.manager = Some(handle);
    }

    pub(crate) fn set_weight_unchecked(&mut self, weight: usize) {
        self.weight = weight;
    }

    /// Number of virtual slots this node places with `replicas` per unit of
    /// weight, or [`Error::TooManySlots`] past [`MAX_SLOTS_PER_NODE`].
    pub fn slot_count(&self, replicas: usize) -> Result<usize> {
        slot_count(&self.key, self.weight, replicas)
    }
}

impl<T: Clone, H: KeyHasher> Node<T, H> {
    /// Virtual slots for this node: one per index in `0..weight * replicas`.
    pub fn virtuals(&self, replicas: usize) -> Result<Vec<Slot<T>>> {
        let total = self.slot_count(replicas)?;
        let owner: Arc<str> = Arc::from(self.key.as_str());
        Ok((0..total)
            .map(|index| {
                Slot::virtual_of::<H>(
                    Arc::clone(&owner),
                    &virtual_key(&self.key, index),
                    self.data.clone(),
                )
            })
            .collect())
    }

    /// Change the node's weight.
    ///
    /// While the node is managed, the manager swaps its virtual slots for the
    /// new set under one write lock. A detached node (never added, removed
    /// since, or whose manager is gone) only records the weight; it takes
    /// effect once the node is added again.
    ///
    /// Fails without touching the ring if `weight` is 0 or the new slot
    /// count exceeds [`MAX_SLOTS_PER_NODE`].
    pub fn set_weight(&mut self, weight: usize) -> Result<()> {
        check_weight(&self.key, weight)?;

        if let Some(registry) = self.manager.as_ref().and_then(Weak::upgrade) {
            if registry.write().reweight(&self.key, weight)? {
                self.weight = weight;
                return Ok(());
            }
        }

        self.manager = None;
        self.weight = weight;
        Ok(())
    }
}

pub(crate) fn check_weight(key: &str, weight: usize) -> Result<()> {
    if weight == 0 || weight > MAX_SLOTS_PER_NODE {
        return Err(Error::InvalidWeight {
            key: key.to_string(),
            weight,
        });
    }
    Ok(())
}

pub(crate) fn slot_count(key: &str, weight: usize, replicas: usize) -> Result<usize> {
    weight
        .checked_mul(replicas)
        .filter(|total| *total <= MAX_SLOTS_PER_NODE)
        .ok_or_else(|| Error::TooManySlots {
            key: key.to_string(),
            weight,
            replicas,
        })
}

impl<T: Clone, H: KeyHasher> Clone for Node<T, H> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            weight: self.weight,
            data: self.data.clone(),
            manager: self.manager.clone(),
        }
    }
}

impl<T: fmt::Debug, H: KeyHasher> fmt::Debug for Node<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("weight", &self.weight)
            .field("data", &self.data)
            .field("attached", &self.is_attached())
            .finish()
    }
}
