//! Tests for the hash ring.
//!
//! # Test Strategy
//!
//! 1. **Basic functionality**: Empty ring, insert/lookup, remove
//! 2. **Ordering**: Sorted iteration, wrap-around
//! 3. **Navigation**: Next/previous stepping and full cycles
//!
//! Six single-character keys are used throughout. Under CRC-32 they sort as
//! `2, 6, 3, 1, 5, 4`.

use corelib::hash;
use corelib::ring::{HashRing, Ring};
use corelib::slot::Slot;

const KEYS: [&str; 6] = ["1", "2", "3", "4", "5", "6"];
const SORTED: [&str; 6] = ["2", "6", "3", "1", "5", "4"];

fn six_slot_ring() -> HashRing<String> {
    let mut ring = HashRing::new();
    ring.insert(KEYS.iter().map(|k| Slot::new(k, k.to_string())));
    ring
}

// ============================================================================
// Basic Functionality Tests
// ============================================================================

#[test]
fn test_empty_ring_lookup() {
    let ring: HashRing<String> = HashRing::new();
    assert!(ring.get("key1").is_none());
    assert_eq!(ring.count(), 0);
}

#[test]
fn test_get_exact_position() {
    let ring = six_slot_ring();

    let pos = ring.get("2").expect("lookup on non-empty ring");
    assert_eq!(pos.hash(), hash("2"));
    assert_eq!(pos.value(), "2");
    assert_eq!(pos.index(), 0);
}

#[test]
fn test_get_successor() {
    let ring = six_slot_ring();

    // "7" hashes between "6" and "3".
    let pos = ring.get("7").unwrap();
    assert_eq!(pos.value(), "3");
}

#[test]
fn test_consistent_lookup() {
    let ring = six_slot_ring();

    let first = ring.get("consistent-key").unwrap().hash();
    let second = ring.get("consistent-key").unwrap().hash();
    assert_eq!(first, second, "Same key should map to same slot");
}

#[test]
fn test_remove_slot() {
    let mut ring = six_slot_ring();
    assert_eq!(ring.get("4").unwrap().value(), "4");

    assert!(ring.remove("4"));
    assert_eq!(ring.count(), 5);

    // "4" was the largest position, so its keys wrap to the smallest.
    assert_eq!(ring.get("4").unwrap().value(), "2");

    assert!(!ring.remove("4"), "Removing an absent key is a no-op");
    assert_eq!(ring.count(), 5);
}

// ============================================================================
// Ordering Tests
// ============================================================================

#[test]
fn test_insert_unsorted_then_sort() {
    let mut ring = HashRing::new();
    ring.insert_unsorted(KEYS.iter().map(|k| Slot::new(k, k.to_string())));
    ring.sort();

    ring.for_each(|index, hash, value| {
        assert_eq!(value, SORTED[index]);
        assert_eq!(hash, corelib::hash(SORTED[index]));
    });
}

#[test]
fn test_iter_matches_for_each() {
    let ring = six_slot_ring();
    let values: Vec<&str> = ring.iter().map(|slot| slot.value().as_str()).collect();
    assert_eq!(values, SORTED);
}

#[test]
fn test_wrap_around_past_last_slot() {
    let mut ring = HashRing::new();
    ring.insert([Slot::new("2", "2"), Slot::new("6", "6")]);

    // "4" hashes above both remaining slots.
    assert!(hash("4") > hash("6"));
    assert_eq!(*ring.get("4").unwrap().value(), "2");
}

// ============================================================================
// Navigation Tests
// ============================================================================

#[test]
fn test_get_next_cycles() {
    let ring = six_slot_ring();

    let mut pos = ring.get("3").unwrap();
    assert_eq!(pos.value(), SORTED[2]);

    pos = ring.get_next(&pos);
    assert_eq!(pos.value(), SORTED[3]);

    let mut index = 3;
    for _ in 0..ring.count() {
        index = (index + 1) % ring.count();
        pos = ring.get_next(&pos);
        assert_eq!(pos.value(), SORTED[index]);
    }
}

#[test]
fn test_get_prev_cycles() {
    let ring = six_slot_ring();

    let mut pos = ring.get("3").unwrap();
    pos = ring.get_prev(&pos);
    assert_eq!(pos.value(), SORTED[1]);

    let mut index = 1;
    for _ in 0..ring.count() {
        index = (index + ring.count() - 1) % ring.count();
        pos = ring.get_prev(&pos);
        assert_eq!(pos.value(), SORTED[index]);
    }
}

#[test]
fn test_next_prev_inverse() {
    let ring = six_slot_ring();

    for key in KEYS {
        let pos = ring.get(key).unwrap();
        assert_eq!(pos.next().prev().hash(), pos.hash());
        assert_eq!(pos.prev().next().hash(), pos.hash());
    }
}

#[test]
fn test_clear() {
    let mut ring = six_slot_ring();
    ring.clear();
    assert!(ring.is_empty());
    assert!(ring.get("1").is_none());

    ring.insert([Slot::new("1", "1".to_string())]);
    assert_eq!(ring.count(), 1);
}

#[test]
fn test_ring_alias_uses_crc32() {
    let mut ring: Ring<String> = Ring::new();
    ring.insert(KEYS.iter().map(|k| Slot::new(k, k.to_string())));
    assert_eq!(ring.hasher_name(), "Crc32");
    assert_eq!(ring.get("7").unwrap().owner(), "3");
}
