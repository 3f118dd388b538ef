//! Property tests for ring construction and key assignment.

use corelib::{build_ring, hash, ownership, token::RING_SIZE};
use proptest::collection::{hash_set, vec};
use proptest::prelude::*;

fn node_names() -> impl Strategy<Value = Vec<String>> {
    hash_set("[A-Za-z][A-Za-z0-9 :_-]{0,12}", 1..8).prop_map(|set| set.into_iter().collect())
}

fn keys() -> impl Strategy<Value = Vec<String>> {
    vec("\\PC{0,16}", 0..40)
}

proptest! {
    #[test]
    fn hash_is_deterministic_and_in_range(s in "\\PC*") {
        let h = hash(&s);
        prop_assert!(h.degrees() < RING_SIZE);
        prop_assert_eq!(h, hash(&s));
    }

    #[test]
    fn ring_has_expected_length_and_order(names in node_names(), v in 0usize..6) {
        let ring = build_ring(names.clone(), v).unwrap();
        prop_assert_eq!(ring.position_count(), names.len() * (1 + v));
        prop_assert!(ring.positions().windows(2).all(|w| w[0].hash <= w[1].hash));
        for name in &names {
            prop_assert_eq!(ring.positions_for(name).count(), 1 + v);
        }
    }

    #[test]
    fn assign_is_total(names in node_names(), v in 0usize..4, keys in keys()) {
        let ring = build_ring(names.clone(), v).unwrap();
        for key in &keys {
            let owner = ring.assign(key).unwrap();
            prop_assert!(names.iter().any(|n| n == owner));
        }
    }

    #[test]
    fn distribute_partitions_keys_exactly(names in node_names(), v in 0usize..4, keys in keys()) {
        let ring = build_ring(names.clone(), v).unwrap();
        let dist = ring.distribute(&keys).unwrap();

        prop_assert_eq!(dist.len(), names.len());
        for name in &names {
            prop_assert!(dist.get(name).is_some());
        }

        let mut collected: Vec<String> = dist.iter().flat_map(|e| e.keys.iter().cloned()).collect();
        let mut expected = keys.clone();
        collected.sort();
        expected.sort();
        prop_assert_eq!(collected, expected);
    }

    #[test]
    fn ownership_covers_the_ring(names in node_names(), v in 0usize..4) {
        let ring = build_ring(names, v).unwrap();
        let total: u32 = ownership(&ring).iter().map(|s| u32::from(s.degrees)).sum();
        prop_assert_eq!(total, u32::from(RING_SIZE));
    }
}
