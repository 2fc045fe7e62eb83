//! Consistent hash ring implementation.
//!
//! The ring keeps slots sorted by position and provides O(log n) successor
//! lookup with wrap-around, plus O(1) clockwise and counter-clockwise steps
//! from any resolved [`Position`].

pub mod position;
pub mod ring;

pub use position::Position;
pub use ring::HashRing;

/// A [`HashRing`] fixed to the default CRC-32 hasher.
///
/// Use `HashRing<T, H>` directly to place slots with another [`KeyHasher`].
///
/// [`KeyHasher`]: crate::hasher::KeyHasher
pub type Ring<T> = HashRing<T>;
