//! SipHash-1-3 hash with fixed zero keys.

use crate::hash::traits::HashFunction;
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// SipHash-1-3 keyed with zeros, so output is stable across processes.
#[derive(Clone, Copy, Debug, Default)]
pub struct SipHash13;

impl HashFunction for SipHash13 {
    #[inline]
    fn hash(&self, data: &[u8]) -> u64 {
        let mut hasher = SipHasher13::new();
        hasher.write(data);
        hasher.finish()
    }

    fn name(&self) -> &'static str {
        "siphash13"
    }
}
