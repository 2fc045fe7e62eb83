//! Ring position implementation.

use std::fmt::{self, Debug};

use crate::hasher::KeyHasher;
use crate::ring::HashRing;
use crate::slot::Slot;

/// A resolved position on the hash ring.
///
/// Couples a slot with its index in the ring's sorted order. The position
/// borrows the ring, so the index can never be used after the ring is
/// mutated: a re-sort or removal invalidates indices, and the borrow checker
/// rejects any such use.
pub struct Position<'a, T, H: KeyHasher> {
    ring: &'a HashRing<T, H>,
    index: usize,
}

impl<'a, T, H: KeyHasher> Position<'a, T, H> {
    /// `index` must be in bounds for `ring`.
    pub(crate) fn new(ring: &'a HashRing<T, H>, index: usize) -> Self {
        debug_assert!(index < ring.count());
        Self { ring, index }
    }

    /// Index of this slot in the ring's sorted order.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn ring(&self) -> &'a HashRing<T, H> {
        self.ring
    }

    /// The slot at this position.
    #[inline]
    pub fn slot(&self) -> &'a Slot<T> {
        &self.ring.slots()[self.index]
    }

    #[inline]
    pub fn hash(&self) -> u32 {
        self.slot().hash()
    }

    #[inline]
    pub fn owner(&self) -> &'a str {
        self.slot().owner()
    }

    #[inline]
    pub fn value(&self) -> &'a T {
        self.slot().value()
    }

    /// The position immediately clockwise, wrapping after the last slot.
    pub fn next(&self) -> Self {
        let index = if self.index + 1 >= self.ring.count() {
            0
        } else {
            self.index + 1
        };
        Self::new(self.ring, index)
    }

    /// The position immediately counter-clockwise, wrapping before the first slot.
    pub fn prev(&self) -> Self {
        let index = if self.index == 0 {
            self.ring.count() - 1
        } else {
            self.index - 1
        };
        Self::new(self.ring, index)
    }
}

impl<T, H: KeyHasher> Clone for Position<'_, T, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, H: KeyHasher> Copy for Position<'_, T, H> {}

impl<T, H: KeyHasher> PartialEq for Position<'_, T, H> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.ring, other.ring) && self.index == other.index
    }
}

impl<T, H: KeyHasher> Eq for Position<'_, T, H> {}

impl<T: Debug, H: KeyHasher> Debug for Position<'_, T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("index", &self.index)
            .field("slot", self.slot())
            .field("hasher", &H::name())
            .finish()
    }
}
