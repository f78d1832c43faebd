//! xxh3 64-bit hash.

use crate::hash::traits::HashFunction;

/// 64-bit xxh3. Better spread than CRC-32 on short, similar keys.
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh3;

impl HashFunction for Xxh3 {
    #[inline]
    fn hash(&self, data: &[u8]) -> u64 {
        xxhash_rust::xxh3::xxh3_64(data)
    }

    fn name(&self) -> &'static str {
        "xxh3"
    }
}
