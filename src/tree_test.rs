use std::{sync::Arc, thread};

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::*;
use crate::config::Config;

fn tree_with_capacity(n: usize) -> Tree {
    let mut config = Config::new();
    config.set_node_capacity(n);
    Tree::new(config).unwrap()
}

#[test]
fn test_s1_split_boundary() {
    let tree = tree_with_capacity(30);
    for k in 1..=30i64 {
        tree.insert(k, k as u64).unwrap();
    }
    assert_eq!(tree.search(15).unwrap(), Some(15));
    assert_eq!(tree.search(16).unwrap(), Some(16));
    assert_eq!(tree.search(30).unwrap(), Some(30));
    assert_eq!(tree.search(31).unwrap(), None);
    tree.validate().unwrap();

    let root = tree.root_snapshot();
    assert!(!root.is_leaf(), "root should have been promoted after the split");
}

#[test]
fn test_s3_range_strict_both_ends() {
    let tree = tree_with_capacity(30);
    for k in 1..=30i64 {
        tree.insert(k, k as u64).unwrap();
    }
    let got = tree.range(10, 20).unwrap();
    let want: Vec<u64> = (11..20).map(|k| k as u64).collect();
    assert_eq!(got, want);
}

#[test]
fn test_s5_delete_no_rebalance() {
    let tree = tree_with_capacity(30);
    for k in 1..=100i64 {
        tree.insert(k, k as u64).unwrap();
    }
    let height_before = tree.to_stats().unwrap().height;
    tree.delete(50).unwrap();
    assert_eq!(tree.search(50).unwrap(), None);
    assert_eq!(tree.search(49).unwrap(), Some(49));
    assert_eq!(tree.search(51).unwrap(), Some(51));
    let height_after = tree.to_stats().unwrap().height;
    assert_eq!(height_before, height_after);
}

#[test]
fn test_s6_string_key_mapping() {
    let tree = tree_with_capacity(8);
    tree.insert_str("foo", 42).unwrap();
    let key = crate::strmap::hash64("foo");
    assert_eq!(tree.search(key).unwrap(), Some(42));
    assert_eq!(tree.get_mapping(key), Some("foo".to_string()));
}

#[test]
fn test_idempotent_reinsert() {
    let tree = tree_with_capacity(8);
    tree.insert(7, 1).unwrap();
    tree.insert(7, 2).unwrap();
    assert_eq!(tree.search(7).unwrap(), Some(2));
}

#[test]
fn test_many_inserts_stay_valid_and_complete() {
    let tree = tree_with_capacity(8);
    for k in 1..=200i64 {
        tree.insert(k, k as u64).unwrap();
    }
    tree.validate().unwrap();
    assert_eq!(tree.len().unwrap(), 200);
    for k in 1..=200i64 {
        assert_eq!(tree.search(k).unwrap(), Some(k as u64));
    }
}

#[test]
fn test_s2_concurrent_insert_and_search_across_splits() {
    let tree = Arc::new(tree_with_capacity(8));

    let writer_tree = Arc::clone(&tree);
    let writer = thread::spawn(move || {
        for k in 1..=500i64 {
            writer_tree.insert(k, k as u64).unwrap();
        }
    });

    let reader_tree = Arc::clone(&tree);
    let reader = thread::spawn(move || {
        // Repeatedly search a key near the middle of the range while the
        // writer is busy splitting leaves out from under it; the point is
        // that a racing search must chase right-links to completion
        // rather than panicking, hanging, or erroring out.
        for _ in 0..3000 {
            reader_tree.search(250).unwrap();
        }
    });

    writer.join().unwrap();
    reader.join().unwrap();

    for k in 1..=500i64 {
        assert_eq!(tree.search(k).unwrap(), Some(k as u64));
    }
    tree.validate().unwrap();
}

#[test]
fn test_random_insert_delete_stays_valid() {
    let tree = tree_with_capacity(6);
    let mut rng = StdRng::seed_from_u64(0xfeed_face);
    let mut model = std::collections::BTreeMap::new();

    for _ in 0..2000 {
        let key = rng.gen_range(0..500i64);
        if rng.gen_bool(0.7) {
            tree.insert(key, key as u64).unwrap();
            model.insert(key, key as u64);
        } else {
            tree.delete(key).unwrap();
            model.remove(&key);
        }
    }

    tree.validate().unwrap();
    for (key, value) in &model {
        assert_eq!(tree.search(*key).unwrap(), Some(*value));
    }
}
