//! Comprehensive tests for the hash ring implementation.
//!
//! # Test Strategy
//!
//! 1. **Basic functionality**: Empty ring, add/lookup, remove
//! 2. **Multiple nodes**: Coverage, consistency, bounded remapping
//! 3. **Edge cases**: Wraparound, single node, duplicate adds
//! 4. **Configuration**: Builder, config files, both lock variants

use corelib::hash::{with_output_bits, Crc32, HashFunction, HashKind, Xxh3};
use corelib::ring::{HashRing, RemoveMode, Ring, RingBuilder, RingConfig, SharedRing};
use corelib::{Error, NodeId};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("key-{i}")).collect()
}

/// Reads the input as a decimal number so ring positions are predictable.
fn decimal(data: &[u8]) -> u64 {
    std::str::from_utf8(data)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

// ============================================================================
// Basic Functionality Tests
// ============================================================================

#[test]
fn test_empty_ring_lookup() {
    // A fresh ring has no owner for any key
    let ring = HashRing::default();
    assert!(ring.is_empty());
    assert_eq!(ring.get("anything"), None);
    assert_eq!(ring.node_count(), 0);
    assert_eq!(ring.token_count(), 0);

    let shared = SharedRing::default();
    assert!(shared.is_empty());
    assert_eq!(shared.get("anything"), None);
}

#[test]
fn test_add_node_and_lookup() {
    let mut ring = HashRing::with_replicas(4);
    ring.add(["node1"]);

    assert!(!ring.is_empty());
    assert_eq!(ring.node_count(), 1);
    assert_eq!(ring.token_count(), 4);

    let owner = ring.get("test-key");
    assert_eq!(owner, Some(NodeId::from("node1")), "Should return the added node");
    assert!(ring.contains("node1"));
}

#[test]
fn test_remove_unknown_node_is_noop() {
    let mut ring = HashRing::with_replicas(4);
    ring.add(["node1", "node2"]);
    let before = ring.tokens();

    assert!(!ring.remove("node999"));
    assert_eq!(ring.tokens(), before);
}

#[test]
fn test_remove_is_idempotent() {
    init_tracing();
    // Removing twice leaves the same state as removing once
    let mut once = HashRing::new(3, decimal);
    let mut twice = HashRing::new(3, decimal);
    once.add(["6", "4", "2"]);
    twice.add(["6", "4", "2"]);

    once.remove("4");
    twice.remove("4");
    twice.remove("4");

    assert_eq!(once.tokens(), twice.tokens());
}

// ============================================================================
// Multiple Nodes Tests
// ============================================================================

#[test]
fn test_two_nodes_cover_every_key() {
    let mut ring = HashRing::with_replicas(3);
    ring.add(["n1", "n2"]);

    for key in keys(1000) {
        let owner = ring.get(&key).expect("non-empty ring always has an owner");
        assert!(owner == "n1" || owner == "n2", "unexpected owner {owner}");
    }
}

#[test]
fn test_consistent_lookup() {
    let ring = RingBuilder::new()
        .with_replicas(4)
        .add_nodes(["node1", "node2"])
        .build();

    let first = ring.get("consistent-key");
    for _ in 0..10 {
        assert_eq!(ring.get("consistent-key"), first, "Same key should map to same node");
    }
}

#[test]
fn test_adding_node_moves_keys_only_to_new_node() {
    let mut ring = HashRing::with_replicas(3);
    ring.add(["n1", "n2"]);
    let keys = keys(1000);
    let before: Vec<NodeId> = keys.iter().filter_map(|k| ring.get(k)).collect();
    assert_eq!(before.len(), keys.len());

    ring.add(["n3"]);
    let mut moved = 0;
    for (key, old) in keys.iter().zip(&before) {
        let new = ring.get(key).unwrap();
        if &new != old {
            assert_eq!(new, "n3", "{key} moved between surviving nodes");
            moved += 1;
        }
    }

    assert!(moved > 0, "n3 should take over some keys");
    assert!(moved < keys.len() / 2, "most keys should keep their owner, {moved} moved");
}

#[test]
fn test_remove_changes_only_the_removed_arc() {
    // decimal("4") == 4, which is replica 0 of node "4". Only keys in
    // (2, 4] can change owner.
    let mut ring = HashRing::new(3, decimal);
    ring.add(["6", "4", "2"]);
    let removed_position = decimal(b"4");

    let positions: Vec<u64> = ring.tokens().into_iter().map(|(p, _)| p).collect();
    let before: Vec<(u64, NodeId)> = (0..30u64)
        .map(|k| (k, ring.get(k.to_string()).unwrap()))
        .collect();

    ring.remove("4");

    for (key, old) in before {
        let idx = positions.partition_point(|&p| p < key) % positions.len();
        let new = ring.get(key.to_string()).unwrap();
        if positions[idx] == removed_position {
            assert_eq!(new, "6", "key {key} should fall through to the next position");
        } else {
            assert_eq!(new, old, "key {key} was not on the removed arc");
        }
    }
}

#[test]
fn test_single_position_remove_keeps_replica_positions() {
    // With a real hash, hash("n1") is almost never one of n1's replica
    // positions, so remove does not take n1 off the ring.
    let mut ring = HashRing::with_replicas(3);
    ring.add(["n1", "n2"]);
    let position = Crc32.hash(b"n1");
    assert!(ring.tokens().iter().all(|(p, _)| *p != position));

    let before = ring.tokens();
    assert!(!ring.remove("n1"));
    assert_eq!(ring.tokens(), before);
    assert!(ring.contains("n1"));
}

#[test]
fn test_all_replicas_remove_takes_node_off_ring() {
    init_tracing();
    let mut ring = RingBuilder::new()
        .with_replicas(3)
        .with_remove_mode(RemoveMode::AllReplicas)
        .add_nodes(["n1", "n2"])
        .build_unsynchronized();

    assert!(ring.remove("n1"));
    assert!(!ring.contains("n1"));
    assert_eq!(ring.token_count(), 3);
    for key in keys(200) {
        assert_eq!(ring.get(&key).unwrap(), "n2");
    }
    assert!(!ring.remove("n1"));
}

// ============================================================================
// Edge Cases
// ============================================================================

#[test]
fn test_wraparound_to_smallest_position() {
    let mut ring = HashRing::with_replicas(3);
    ring.add(["n1", "n2"]);
    let tokens = ring.tokens();
    let (max_position, _) = tokens.last().unwrap();
    let (_, first_owner) = &tokens[0];

    // crc32("key-23") lies beyond every position of this ring.
    assert!(Crc32.hash(b"key-23") > *max_position);
    assert_eq!(ring.get("key-23").as_ref(), Some(first_owner));
    assert_eq!(ring.get_by_hash(u64::MAX), Some(first_owner));
}

#[test]
fn test_wraparound_with_custom_hash() {
    let mut ring = HashRing::new(2, decimal);
    ring.add(["5", "7"]);
    // Positions 5, 7, 15, 17.
    assert_eq!(ring.get("16").unwrap(), "7");
    assert_eq!(ring.get("18").unwrap(), "5");
    assert_eq!(ring.get("999").unwrap(), "5");
}

#[test]
fn test_single_node() {
    let mut ring = HashRing::with_replicas(4);
    ring.add(["node1"]);

    for key in ["key1", "key2", "key3", "very-long-key-name"] {
        assert_eq!(ring.get(key).unwrap(), "node1", "All keys should map to single node");
    }
}

#[test]
fn test_duplicate_add_duplicates_positions() {
    // Adding the same node twice is not idempotent
    let mut ring = HashRing::with_replicas(4);
    ring.add(["node1"]);
    assert_eq!(ring.token_count(), 4);

    ring.add(["node1"]);
    assert_eq!(ring.token_count(), 8);
    assert_eq!(ring.node_count(), 1);
}

#[test]
fn test_add_remove_add() {
    let mut ring = RingBuilder::new()
        .with_replicas(4)
        .with_remove_mode(RemoveMode::AllReplicas)
        .build_unsynchronized();

    ring.add(["node1"]);
    assert!(ring.remove("node1"));
    assert!(ring.is_empty());
    assert_eq!(ring.get("key"), None);

    ring.add(["node1"]);
    assert_eq!(ring.token_count(), 4);
    assert_eq!(ring.get("key").unwrap(), "node1");
}

#[test]
fn test_zero_replicas_defaults_to_twenty() {
    let mut ring = HashRing::with_replicas(0);
    ring.add(["a", "b"]);
    assert_eq!(ring.token_count(), 40);
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[test]
fn test_ring_builder_default() {
    let ring = RingBuilder::new().add_node("node1").add_node("node2").build();

    assert!(ring.get("key").is_some());
    assert_eq!(ring.node_count(), 2);
    assert_eq!(ring.token_count(), 40);
    assert_eq!(ring.hasher_name(), "crc32");
}

#[test]
fn test_ring_builder_custom_hash() {
    let ring = RingBuilder::new()
        .with_replicas(8)
        .with_hash(|data: &[u8]| data.iter().map(|b| u64::from(*b)).sum::<u64>())
        .add_node("node1")
        .build_unsynchronized();

    assert_eq!(ring.hasher_name(), "custom");
    assert_eq!(ring.token_count(), 8);
}

#[test]
fn test_config_from_json() {
    let config: RingConfig = serde_json::from_str(
        r#"{ "replicas": 5, "hash": "xxh3", "remove_mode": "all_replicas", "synchronized": false }"#,
    )
    .unwrap();
    assert_eq!(config.hash, HashKind::Xxh3);

    let mut ring = Ring::from_config(&config).unwrap();
    assert!(!ring.is_synchronized());
    ring.add(["a", "b"]);
    assert_eq!(ring.len(), 10);
    assert!(ring.remove("a"));
    assert_eq!(ring.nodes(), vec![NodeId::from("b")]);
}

#[test]
fn test_config_defaults_fill_missing_fields() {
    let config: RingConfig = serde_json::from_str(r#"{ "replicas": 0 }"#).unwrap();
    assert_eq!(config.effective_replicas(), 20);
    assert_eq!(config.hash, HashKind::Crc32);

    let ring = Ring::from_config(&config).unwrap();
    assert!(ring.is_synchronized());
    assert!(ring.is_empty());
}

#[test]
fn test_config_rejects_unknown_hash() {
    let result = serde_json::from_str::<RingConfig>(r#"{ "hash": "md5" }"#);
    assert!(result.is_err());
    assert_eq!(
        "md5".parse::<HashKind>(),
        Err(Error::UnknownHash("md5".to_string()))
    );
}

#[test]
fn test_config_rejects_oversized_replicas() {
    let config = RingConfig {
        replicas: 1_000_000,
        ..RingConfig::default()
    };
    assert!(matches!(Ring::from_config(&config), Err(Error::InvalidConfig(_))));
}

#[test]
fn test_topology_shares_sum_to_one() {
    let ring = RingBuilder::new()
        .with_replicas(50)
        .add_nodes(["a", "b", "c", "d"])
        .build();

    let ownership = ring.topology().ownership();
    assert_eq!(ownership.len(), 4);
    let total: f64 = ownership.iter().map(|(_, share)| share).sum();
    assert!((total - 1.0).abs() < 1e-9);
}

/// 64-bit output that claims to be 32 bits wide.
struct UnderReported;

impl HashFunction for UnderReported {
    fn hash(&self, data: &[u8]) -> u64 {
        Xxh3.hash(data)
    }

    fn output_bits(&self) -> u32 {
        32
    }

    fn name(&self) -> &'static str {
        "under-reported"
    }
}

#[test]
fn test_topology_survives_under_reported_width() {
    let mut ring = HashRing::new(20, UnderReported);
    ring.add(["a", "b", "c"]);

    let topology = ring.topology();
    assert_eq!(topology.bits(), 64);
    let ownership = topology.ownership();
    let total: f64 = ownership.iter().map(|(_, share)| share).sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn test_closure_hash_with_declared_width() {
    let nodes = ["a", "b", "c", "d"];
    let mut builtin = HashRing::new(20, Crc32);
    let mut closure = HashRing::new(
        20,
        with_output_bits(|data: &[u8]| Crc32.hash(data), 32),
    );
    builtin.add(nodes);
    closure.add(nodes);

    assert_eq!(closure.tokens(), builtin.tokens());
    let expected = builtin.topology().ownership();
    let actual = closure.topology().ownership();
    for node in nodes {
        assert!(
            (actual.share(node) - expected.share(node)).abs() < 1e-12,
            "{node}: {} vs {}",
            actual.share(node),
            expected.share(node)
        );
    }
}
