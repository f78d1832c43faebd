//! Hash functions for placing virtual nodes and keys on the ring.
//!
//! Every ring carries its own [`HashFunction`]; there is no process-wide
//! default. When the caller does not pick one, rings use [`Crc32`].

pub mod crc32;
pub mod siphash;
pub mod traits;
pub mod width;
pub mod xxh3;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use crc32::Crc32;
pub use siphash::SipHash13;
pub use traits::HashFunction;
pub use width::{with_output_bits, WithOutputBits};
pub use xxh3::Xxh3;

/// Names one of the built-in hash functions, for configuration files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashKind {
    /// CRC-32 (IEEE polynomial), 32-bit output.
    #[default]
    Crc32,
    /// xxh3, 64-bit output.
    Xxh3,
    /// SipHash-1-3 with zero keys, 64-bit output.
    SipHash13,
}

impl HashKind {
    /// Instantiate the named hash function.
    pub fn build(self) -> Arc<dyn HashFunction> {
        match self {
            HashKind::Crc32 => Arc::new(Crc32),
            HashKind::Xxh3 => Arc::new(Xxh3),
            HashKind::SipHash13 => Arc::new(SipHash13),
        }
    }

    /// Name used in configuration files and by [`HashFunction::name`].
    pub fn as_str(&self) -> &'static str {
        match self {
            HashKind::Crc32 => "crc32",
            HashKind::Xxh3 => "xxh3",
            HashKind::SipHash13 => "siphash13",
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crc32" => Ok(HashKind::Crc32),
            "xxh3" => Ok(HashKind::Xxh3),
            "siphash13" => Ok(HashKind::SipHash13),
            _ => Err(Error::UnknownHash(s.to_string())),
        }
    }
}
