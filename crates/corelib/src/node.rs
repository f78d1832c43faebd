//! Node identity for the consistent hash ring.
//!
//! A node is whatever the caller says it is: a hostname, a shard label, an
//! address. The ring tracks nothing beyond the identifier itself.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Opaque identifier of a real node (backend, shard, instance).
///
/// Backed by an `Arc<str>` so the `replicas` table entries that point at the
/// same node share one allocation and clones stay cheap.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(Arc<str>);

impl NodeId {
    /// Construct a node id from anything string-like.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// The identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier as raw bytes, which is what gets hashed.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl From<&String> for NodeId {
    fn from(id: &String) -> Self {
        Self::new(id)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_compares_with_str() {
        let id = NodeId::from("cache-01");
        assert_eq!(id, "cache-01");
        assert_eq!(id.as_str(), "cache-01");
        assert_eq!(id.to_string(), "cache-01");
    }

    #[test]
    fn test_node_id_clones_share_storage() {
        let id = NodeId::from(String::from("cache-02"));
        let other = id.clone();
        assert!(Arc::ptr_eq(&id.0, &other.0));
    }
}
