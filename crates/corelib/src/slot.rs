//! Ring slots.
//!
//! A slot is one entry on the ring: a 32-bit position, the logical owner it
//! stands for and the payload handed back on lookup. A node with weight `w`
//! in a manager with `r` replicas is represented by `w * r` slots, all sharing
//! the same owner.

use std::fmt;
use std::sync::Arc;

use crate::hasher::{Crc32, KeyHasher};

/// An immutable entry on the hash ring.
///
/// # Invariants
///
/// - Within one ring, `hash` values are unique (first writer wins).
/// - `hash` was produced by the same hasher as the ring it is inserted in.
///
/// Slots do not remember where they sit in the ring. Lookups return a
/// [`Position`](crate::ring::Position) which carries that index for as long
/// as the ring stays borrowed.
#[derive(Clone, PartialEq, Eq)]
pub struct Slot<T> {
    hash: u32,
    owner: Arc<str>,
    value: T,
}

impl<T> Slot<T> {
    /// Create a slot keyed by `key` using the default CRC-32 hasher.
    ///
    /// The slot is its own owner.
    pub fn new(key: &str, value: T) -> Self {
        Self::with_hasher::<Crc32>(key, value)
    }

    /// Create a slot keyed by `key` using hasher `H`.
    pub fn with_hasher<H: KeyHasher>(key: &str, value: T) -> Self {
        Self {
            hash: H::hash(key.as_bytes()),
            owner: Arc::from(key),
            value,
        }
    }

    /// Create a virtual slot: positioned by `virtual_key`, owned by `owner`.
    pub fn virtual_of<H: KeyHasher>(owner: Arc<str>, virtual_key: &str, value: T) -> Self {
        Self {
            hash: H::hash(virtual_key.as_bytes()),
            owner,
            value,
        }
    }

    /// Ring position of this slot.
    #[inline]
    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// Key of the logical node this slot represents.
    #[inline]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("hash", &format_args!("{:08x}", self.hash))
            .field("owner", &self.owner)
            .field("value", &self.value)
            .finish()
    }
}

impl<T> fmt::Display for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot(hash={:08x}, owner={})", self.hash, self.owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::Xxh3;

    #[test]
    fn test_slot_creation() {
        let slot = Slot::new("node1", 7u32);
        assert_eq!(slot.hash(), crate::hasher::hash("node1"));
        assert_eq!(slot.owner(), "node1");
        assert_eq!(*slot.value(), 7);
        assert_eq!(slot.into_value(), 7);
    }

    #[test]
    fn test_virtual_slot_shares_owner() {
        let owner: Arc<str> = Arc::from("node1");
        let a = Slot::virtual_of::<Crc32>(owner.clone(), "node1-0", ());
        let b = Slot::virtual_of::<Crc32>(owner, "node1-1", ());

        assert_ne!(a.hash(), b.hash());
        assert_eq!(a.owner(), b.owner());
    }

    #[test]
    fn test_slot_hasher_selection() {
        let crc = Slot::new("key", ());
        let xxh = Slot::with_hasher::<Xxh3>("key", ());
        assert_eq!(xxh.hash(), Xxh3::hash(b"key"));
        assert_eq!(crc.owner(), xxh.owner());
    }
}
