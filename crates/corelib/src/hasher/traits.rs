//! Core hasher trait definitions.

use std::fmt::Debug;

/// A hasher places keys on the 32-bit ring.
///
/// Hashers are stateless marker types: the same key must always produce the
/// same position, and every slot of one ring must be hashed by the same
/// implementation. There is no cryptographic requirement, only a roughly
/// uniform spread over `u32`.
pub trait KeyHasher: Clone + Copy + Debug + Default + Send + Sync + 'static {
    /// Converts a key into a ring position.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to hash
    ///
    /// # Returns
    ///
    /// A 32-bit position on the ring
    fn hash(key: &[u8]) -> u32;

    /// Returns the name of this hasher.
    fn name() -> &'static str;
}
