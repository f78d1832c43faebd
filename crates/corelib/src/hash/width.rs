//! Declared output width for hash functions that cannot state it themselves.

use crate::hash::traits::HashFunction;

/// A hash function with an explicit output width.
///
/// Closures always report 64 bits. Wrap a closure that only produces 32-bit
/// values (a CRC-32 or FNV-32 shim, say) so topology analysis measures arcs
/// on the right circle:
///
/// ```
/// use corelib::hash::{with_output_bits, HashFunction};
///
/// let crc = with_output_bits(|data: &[u8]| u64::from(crc32fast::hash(data)), 32);
/// assert_eq!(crc.output_bits(), 32);
/// ```
///
/// Placement and lookup never look at the width; only
/// [`Topology`](crate::topology::Topology) does.
#[derive(Clone, Copy, Debug)]
pub struct WithOutputBits<H> {
    inner: H,
    bits: u32,
}

/// Wrap `hash`, declaring its output as `bits` wide (clamped to `1..=64`).
pub fn with_output_bits<H: HashFunction>(hash: H, bits: u32) -> WithOutputBits<H> {
    WithOutputBits {
        inner: hash,
        bits: bits.clamp(1, 64),
    }
}

impl<H: HashFunction> HashFunction for WithOutputBits<H> {
    #[inline]
    fn hash(&self, data: &[u8]) -> u64 {
        self.inner.hash(data)
    }

    fn output_bits(&self) -> u32 {
        self.bits
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
