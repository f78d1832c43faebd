//! Core hash function trait definitions.

/// Maps an arbitrary byte sequence to a position on the ring.
///
/// Implementations must be deterministic: equal input bytes give equal
/// output across calls and across process restarts. A ring built with one
/// hash function cannot be compared with a ring built with another.
pub trait HashFunction: Send + Sync + 'static {
    /// Hash `data` to a ring position.
    fn hash(&self, data: &[u8]) -> u64;

    /// Width of the output in bits. Positions lie in `[0, 2^output_bits)`.
    ///
    /// Only ownership analysis reads this. Values above 64 are treated as
    /// 64, and positions that do not fit widen the space to `2^64`.
    fn output_bits(&self) -> u32 {
        64
    }

    /// Returns the name of this hash function.
    fn name(&self) -> &'static str;
}

/// Any plain function or closure over bytes can drive a ring.
///
/// Closures report 64 output bits. Wrap 32-bit closures with
/// [`with_output_bits`](crate::hash::with_output_bits).
///
/// ```
/// use corelib::hash::HashFunction;
///
/// let identity = |data: &[u8]| data.len() as u64;
/// assert_eq!(identity.hash(b"abc"), 3);
/// ```
impl<F> HashFunction for F
where
    F: Fn(&[u8]) -> u64 + Send + Sync + 'static,
{
    #[inline]
    fn hash(&self, data: &[u8]) -> u64 {
        self(data)
    }

    fn name(&self) -> &'static str {
        "custom"
    }
}
