//! Hash functions for placing keys on the ring.
//!
//! Every ring position is a `u32`. CRC-32 is the default; the other
//! implementations are drop-in replacements selected through the `H` type
//! parameter of [`HashRing`](crate::ring::HashRing) and
//! [`NodeManager`](crate::manager::NodeManager).

pub mod crc32;
pub mod sip;
pub mod traits;
pub mod xxh3;

pub use crc32::Crc32;
pub use sip::Sip13;
pub use traits::KeyHasher;
pub use xxh3::Xxh3;

/// Hashes `key` with the default hasher ([`Crc32`]).
#[inline]
pub fn hash(key: &str) -> u32 {
    Crc32::hash(key.as_bytes())
}
