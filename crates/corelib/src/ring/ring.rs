//! Hash ring data structure.
//!
//! Two views are kept in lockstep: a sorted `Vec` of slots for binary search
//! and circular stepping, and a `HashSet` of occupied positions for O(1)
//! duplicate detection. Every method that mutates one updates the other.
//!
//! The ring is not synchronized. Shared use goes through
//! [`NodeManager`](crate::manager::NodeManager), which holds it behind a
//! single reader/writer lock.

use std::collections::HashSet;
use std::marker::PhantomData;

use tracing::trace;

use crate::hasher::{Crc32, KeyHasher};
use crate::ring::position::Position;
use crate::slot::Slot;

const DEFAULT_CAPACITY: usize = 2048;

/// Sorted circular collection of slots.
///
/// # Invariants
///
/// - `occupied` and the hashes in `slots` are equal as sets.
/// - `slots` is sorted ascending by hash after every call except
///   [`insert_unsorted`](Self::insert_unsorted), which defers to
///   [`sort`](Self::sort).
#[derive(Clone, Debug)]
pub struct HashRing<T, H: KeyHasher = Crc32> {
    slots: Vec<Slot<T>>,
    occupied: HashSet<u32>,
    _hasher: PhantomData<H>,
}

impl<T> HashRing<T> {
    /// Create an empty ring using the default CRC-32 hasher.
    pub fn new() -> Self {
        Self::with_hasher()
    }
}

impl<T> Default for HashRing<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, H: KeyHasher> HashRing<T, H> {
    /// Create an empty ring using hasher `H`.
    pub fn with_hasher() -> Self {
        Self {
            slots: Vec::with_capacity(DEFAULT_CAPACITY),
            occupied: HashSet::with_capacity(DEFAULT_CAPACITY),
            _hasher: PhantomData,
        }
    }

    /// Build a slot positioned by this ring's hasher.
    pub fn slot(key: &str, value: T) -> Slot<T> {
        Slot::with_hasher::<H>(key, value)
    }

    /// Add slots without restoring sort order.
    ///
    /// Slots whose hash is already present are skipped; the first writer
    /// wins. Call [`sort`](Self::sort) once after the batch and before any
    /// lookup. Returns the number of slots actually inserted.
    pub fn insert_unsorted<I>(&mut self, slots: I) -> usize
    where
        I: IntoIterator<Item = Slot<T>>,
    {
        let before = self.slots.len();
        for slot in slots {
            if self.occupied.insert(slot.hash()) {
                self.slots.push(slot);
            }
        }
        let inserted = self.slots.len() - before;
        trace!(inserted, total = self.slots.len(), "inserted slots");
        inserted
    }

    /// Add slots and re-sort. Prefer one `insert_unsorted` batch followed by
    /// a single `sort` for bulk loads.
    pub fn insert<I>(&mut self, slots: I) -> usize
    where
        I: IntoIterator<Item = Slot<T>>,
    {
        let inserted = self.insert_unsorted(slots);
        self.sort();
        inserted
    }

    /// Restore ascending order of positions.
    pub fn sort(&mut self) {
        self.slots.sort_unstable_by_key(Slot::hash);
    }

    /// Remove the slot positioned by `key`. Returns `false` if absent.
    pub fn remove(&mut self, key: &str) -> bool {
        self.remove_where(H::hash(key.as_bytes()), |_| true)
    }

    /// Remove the slot positioned by `key` only if it belongs to `owner`.
    ///
    /// A slot whose position collides with another owner's slot was never
    /// inserted; this keeps its removal from deleting the other owner's slot.
    pub fn remove_owned(&mut self, key: &str, owner: &str) -> bool {
        self.remove_where(H::hash(key.as_bytes()), |slot| slot.owner() == owner)
    }

    fn remove_where<F>(&mut self, hash: u32, accept: F) -> bool
    where
        F: Fn(&Slot<T>) -> bool,
    {
        if !self.occupied.contains(&hash) {
            return false;
        }

        let index = match self.slots.binary_search_by_key(&hash, Slot::hash) {
            Ok(index) => index,
            // Unsorted batch still pending.
            Err(_) => match self.slots.iter().position(|slot| slot.hash() == hash) {
                Some(index) => index,
                None => return false,
            },
        };
        if !accept(&self.slots[index]) {
            return false;
        }

        if self.slots.len() == 1 {
            self.clear();
        } else {
            self.slots.remove(index);
            self.occupied.remove(&hash);
        }
        trace!(hash, total = self.slots.len(), "removed slot");
        true
    }

    /// True if a slot is positioned by `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.occupied.contains(&H::hash(key.as_bytes()))
    }

    /// Resolve `key` to the first slot whose position is at or after the
    /// key's hash, wrapping to the first slot past the end.
    ///
    /// Returns `None` only for an empty ring.
    pub fn get(&self, key: &str) -> Option<Position<'_, T, H>> {
        if self.slots.is_empty() {
            return None;
        }
        Some(Position::new(self, self.find(H::hash(key.as_bytes()))))
    }

    /// The slot following `position`, wrapping to the first.
    ///
    /// Same as [`Position::next`]; `position` must come from this ring.
    pub fn get_next<'a>(&self, position: &Position<'a, T, H>) -> Position<'a, T, H> {
        debug_assert!(
            std::ptr::eq(self, position.ring()),
            "position belongs to another ring"
        );
        position.next()
    }

    /// The slot preceding `position`, wrapping to the last.
    ///
    /// Same as [`Position::prev`]; `position` must come from this ring.
    pub fn get_prev<'a>(&self, position: &Position<'a, T, H>) -> Position<'a, T, H> {
        debug_assert!(
            std::ptr::eq(self, position.ring()),
            "position belongs to another ring"
        );
        position.prev()
    }

    /// Visit every slot in ascending order with its index, hash and value.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(usize, u32, &T),
    {
        for (index, slot) in self.slots.iter().enumerate() {
            f(index, slot.hash(), slot.value());
        }
    }

    /// Iterate slots in ascending order.
    pub fn iter(&self) -> std::slice::Iter<'_, Slot<T>> {
        self.slots.iter()
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Forget every slot.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.occupied.clear();
    }

    pub fn hasher_name(&self) -> &'static str {
        H::name()
    }

    pub(crate) fn slots(&self) -> &[Slot<T>] {
        &self.slots
    }

    fn find(&self, hash: u32) -> usize {
        let index = self.slots.partition_point(|slot| slot.hash() < hash);
        if index == self.slots.len() {
            0
        } else {
            index
        }
    }
}

impl<'a, T, H: KeyHasher> IntoIterator for &'a HashRing<T, H> {
    type Item = &'a Slot<T>;
    type IntoIter = std::slice::Iter<'a, Slot<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
