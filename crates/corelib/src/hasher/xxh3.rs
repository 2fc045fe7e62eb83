//! XXH3 hasher implementation.

use crate::hasher::traits::KeyHasher;
use xxhash_rust::xxh3::xxh3_64;

/// Low 32 bits of XXH3-64.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Xxh3;

impl KeyHasher for Xxh3 {
    #[inline]
    fn hash(key: &[u8]) -> u32 {
        xxh3_64(key) as u32
    }

    fn name() -> &'static str {
        "Xxh3"
    }
}
