//! Tests for the node manager.
//!
//! The fixture mirrors a small cluster: six nodes `test1..test6`, weight 1,
//! ten replicas each, for sixty slots.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use corelib::{Direction, Node, NodeManager};

const REPLICAS: usize = 10;

fn six_node_manager() -> NodeManager<String> {
    let manager = NodeManager::new(REPLICAS);
    for i in 1..=6 {
        let key = format!("test{i}");
        manager.add(Node::new(key.clone(), key)).unwrap();
    }
    manager
}

// ============================================================================
// Weight Tests
// ============================================================================

#[test]
fn test_replica_count() {
    let manager = six_node_manager();
    assert_eq!(manager.count(), 6);
    assert_eq!(manager.slots(), 6 * REPLICAS);
}

#[test]
fn test_set_weight_through_node() {
    let manager = six_node_manager();

    let mut node = manager.get_node("test3").expect("test3 is managed");
    assert!(node.is_attached());
    node.set_weight(10).unwrap();

    assert_eq!(node.weight(), 10);
    assert_eq!(manager.slots(), 60 - 10 + 100);
    assert_eq!(manager.get_node("test3").unwrap().weight(), 10);

    // Removing a weighted node drops exactly weight * replicas slots.
    assert!(manager.remove("test3"));
    assert_eq!(manager.slots(), 150 - 10 * REPLICAS);
    assert!(manager.get_node("test3").is_none());
}

#[test]
fn test_set_weight_after_removal_is_local() {
    let manager = six_node_manager();
    let mut node = manager.get_node("test2").unwrap();
    manager.remove("test2");

    node.set_weight(3).unwrap();
    assert!(!node.is_attached());
    assert_eq!(manager.slots(), 5 * REPLICAS);

    // Takes effect once added again.
    manager.add(node).unwrap();
    assert_eq!(manager.slots(), 5 * REPLICAS + 3 * REPLICAS);
}

#[test]
fn test_set_weight_after_manager_dropped() {
    let manager = six_node_manager();
    let mut node = manager.get_node("test1").unwrap();
    drop(manager);

    assert!(!node.is_attached());
    node.set_weight(2).unwrap();
    assert_eq!(node.weight(), 2);
}

#[test]
fn test_add_remove_add() {
    let manager = NodeManager::new(4);
    manager.add(Node::new("node1", 1)).unwrap();
    assert!(manager.remove("node1"));
    assert_eq!(manager.count(), 0);
    assert_eq!(manager.slots(), 0);

    manager.add(Node::new("node1", 1)).unwrap();
    assert_eq!(manager.count(), 1);
    assert!(manager.find_one("key").is_some());
}

// ============================================================================
// Lookup Tests
// ============================================================================

#[test]
fn test_find_current_node() {
    let manager = six_node_manager();
    let slot = manager.find_one("test1-0").expect("non-empty ring");
    assert_eq!(slot.value(), "test1");
    assert_eq!(slot.owner(), "test1");
}

#[test]
fn test_find_successor_node() {
    let manager = six_node_manager();
    let slot = manager.find_one("test").unwrap();
    assert_eq!(slot.value(), "test6");
}

#[test]
fn test_find_on_empty_manager() {
    let manager: NodeManager<String> = NodeManager::new(REPLICAS);
    assert!(manager.find_one("test").is_none());
    assert!(manager.find_prev("test", 3).is_empty());
}

#[test]
fn test_find_next_nodes() {
    let manager = six_node_manager();
    let slots = manager.find_next("test1", 5);
    assert_eq!(slots.len(), 5);
    assert_eq!(slots[0].hash(), manager.find_one("test1").unwrap().hash());
}

#[test]
fn test_find_prev_nodes() {
    let manager = six_node_manager();
    let slots = manager.find_prev("test", 5);
    assert_eq!(slots.len(), 5);
    assert_eq!(slots[0].value(), "test6");
}

#[test]
fn test_find_next_is_capped_by_node_count() {
    let manager = six_node_manager();
    let slots = manager.find_next("test", 70);
    assert_eq!(slots.len(), 6);

    let owners: HashSet<&str> = slots.iter().map(|s| s.owner()).collect();
    assert_eq!(owners.len(), 6, "Each node appears once");
}

#[test]
fn test_find_single_node_returns_one() {
    let manager = NodeManager::new(REPLICAS);
    manager.add(Node::new("only", ())).unwrap();
    assert_eq!(manager.find_next("k", 4).len(), 1);
    assert_eq!(manager.find_prev("k", 4).len(), 1);
}

#[test]
fn test_find_directions_match_find() {
    let manager = six_node_manager();
    let next: Vec<u32> = manager.find_next("abc", 3).iter().map(|s| s.hash()).collect();
    let via_find: Vec<u32> = manager
        .find("abc", 3, Direction::Clockwise)
        .iter()
        .map(|s| s.hash())
        .collect();
    assert_eq!(next, via_find);
}

#[test]
fn test_find_next_follows_ring_order() {
    let manager = six_node_manager();

    // Owners in the order they first appear walking clockwise from the key.
    let mut ring = Vec::new();
    manager.for_each_slot(|_, hash, value| ring.push((hash, value.clone())));
    let start = ring
        .iter()
        .position(|(hash, _)| *hash == manager.find_one("walk").unwrap().hash())
        .unwrap();
    let mut expected: Vec<String> = Vec::new();
    for i in 0..ring.len() {
        let owner = &ring[(start + i) % ring.len()].1;
        if !expected.contains(owner) {
            expected.push(owner.clone());
        }
    }

    let found: Vec<String> = manager
        .find_next("walk", 6)
        .into_iter()
        .map(|s| s.into_value())
        .collect();
    assert_eq!(found, expected);
}

#[test]
fn test_get_nodes_snapshot() {
    let manager = six_node_manager();
    let mut keys: Vec<String> = manager
        .get_nodes()
        .iter()
        .map(|n| n.key().to_string())
        .collect();
    keys.sort();
    assert_eq!(keys, ["test1", "test2", "test3", "test4", "test5", "test6"]);
}

// ============================================================================
// Thread Safety Tests
// ============================================================================

#[test]
fn test_concurrent_readers_and_writers() {
    let manager = Arc::new(six_node_manager());

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                for i in 0..50 {
                    let key = format!("extra-{t}-{i}");
                    manager.add(Node::new(key.clone(), key.clone())).unwrap();
                    manager.remove(&key);
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|t| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                for i in 0..200 {
                    let slots = manager.find_next(&format!("key-{t}-{i}"), 3);
                    assert_eq!(slots.len(), 3);
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }

    assert_eq!(manager.count(), 6);
    assert_eq!(manager.slots(), 6 * REPLICAS);
}
