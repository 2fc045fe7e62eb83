//! SipHash-1-3 hasher implementation.

use crate::hasher::traits::KeyHasher;
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Low 32 bits of SipHash-1-3 with zero keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sip13;

impl KeyHasher for Sip13 {
    fn hash(key: &[u8]) -> u32 {
        let mut hasher = SipHasher13::new();
        hasher.write(key);
        hasher.finish() as u32
    }

    fn name() -> &'static str {
        "Sip13"
    }
}
