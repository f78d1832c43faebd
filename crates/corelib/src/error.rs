//! Error types for the core library.
//!
//! Ring operations themselves never fail; the only fallible surface is
//! turning a [`RingConfig`](crate::ring::RingConfig) into a ring.

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring a ring.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Configuration value out of range
    #[error("Invalid ring configuration: {0}")]
    InvalidConfig(String),
    /// Hash function name not recognised
    #[error("Unknown hash function: {0}")]
    UnknownHash(String),
}
