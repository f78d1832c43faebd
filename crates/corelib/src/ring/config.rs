//! Ring configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hash::HashKind;

/// Replica count used when the caller asks for zero.
pub const DEFAULT_REPLICAS: usize = 20;

/// Upper bound accepted by [`RingConfig::validate`].
pub const MAX_REPLICAS: usize = 65_536;

/// What `remove` takes off the ring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoveMode {
    /// Remove the single position `hash(node_id)`, the node id hashed as if
    /// it were a key. This does not undo an `add` when `replicas > 1`: the
    /// replica positions stay on the ring and keep routing to the node.
    /// Rings that must place keys exactly like existing deployments keep
    /// this mode.
    #[default]
    SinglePosition,
    /// Recompute every replica position `add` created for the node and
    /// remove those still owned by it.
    AllReplicas,
}

/// Serializable ring settings.
///
/// ```
/// use corelib::ring::{RingConfig, RemoveMode};
/// use corelib::hash::HashKind;
///
/// let config = RingConfig::default();
/// assert_eq!(config.replicas, 20);
/// assert_eq!(config.hash, HashKind::Crc32);
/// assert_eq!(config.remove_mode, RemoveMode::SinglePosition);
/// assert!(config.synchronized);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Virtual positions per node. Zero means [`DEFAULT_REPLICAS`].
    pub replicas: usize,
    /// Hash function placing nodes and keys.
    pub hash: HashKind,
    /// Behavior of `remove`.
    pub remove_mode: RemoveMode,
    /// Guard the ring with an internal reader/writer lock. Turn off only
    /// when the caller already serializes access.
    pub synchronized: bool,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            hash: HashKind::default(),
            remove_mode: RemoveMode::default(),
            synchronized: true,
        }
    }
}

impl RingConfig {
    /// Replica count after substituting the default for zero.
    pub fn effective_replicas(&self) -> usize {
        effective_replicas(self.replicas)
    }

    pub fn validate(&self) -> Result<()> {
        if self.replicas > MAX_REPLICAS {
            return Err(Error::InvalidConfig(format!(
                "replicas must be at most {}, got {}",
                MAX_REPLICAS, self.replicas
            )));
        }
        Ok(())
    }
}

#[inline]
pub(crate) fn effective_replicas(replicas: usize) -> usize {
    if replicas == 0 {
        DEFAULT_REPLICAS
    } else {
        replicas
    }
}
