//! CRC-32 hash (IEEE polynomial), the default ring hash.

use crate::hash::traits::HashFunction;

/// CRC-32/IEEE checksum used as a ring hash.
///
/// Fast with adequate spread for placement; not collision resistant against
/// an adversary choosing keys.
#[derive(Clone, Copy, Debug, Default)]
pub struct Crc32;

impl HashFunction for Crc32 {
    #[inline]
    fn hash(&self, data: &[u8]) -> u64 {
        u64::from(crc32fast::hash(data))
    }

    fn output_bits(&self) -> u32 {
        32
    }

    fn name(&self) -> &'static str {
        "crc32"
    }
}
