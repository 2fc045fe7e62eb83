//! CRC-32 (IEEE) hasher implementation.

use crate::hasher::traits::KeyHasher;

/// IEEE CRC-32 hasher, the default for every ring.
///
/// Produces the standard checksum, so rings built elsewhere with CRC-32 and
/// the same virtual-key format place their slots identically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Crc32;

impl KeyHasher for Crc32 {
    #[inline]
    fn hash(key: &[u8]) -> u32 {
        crc32fast::hash(key)
    }

    fn name() -> &'static str {
        "Crc32"
    }
}
