//! Core library for consistent hashing implementation.
//!
//! This crate provides an in-memory consistent hash ring for routing keys
//! to a changing set of nodes:
//! - Pluggable hash functions (CRC-32 by default)
//! - Virtual node placement
//! - Unsynchronized and lock-guarded ring variants
//! - Ring topology and ownership analysis
//!
//! ```
//! use corelib::SharedRing;
//!
//! let ring = SharedRing::with_replicas(20);
//! assert_eq!(ring.get("user:1"), None);
//!
//! ring.add(["10.0.0.1:6379", "10.0.0.2:6379"]);
//! let owner = ring.get("user:1").unwrap();
//! assert_eq!(ring.get("user:1").unwrap(), owner);
//! ```

pub mod error;
pub mod hash;
pub mod node;
pub mod ring;
pub mod topology;
pub mod vnode;

pub use error::{Error, Result};
pub use hash::{HashFunction, HashKind};
pub use node::NodeId;
pub use ring::{HashRing, RemoveMode, Ring, RingBuilder, RingConfig, SharedRing};
pub use topology::{Ownership, Topology};
pub use vnode::VirtualNode;
