use crate::config::Config;
use crate::tree::Tree;

fn tree_with_capacity(n: usize) -> Tree {
    let mut config = Config::new();
    config.set_node_capacity(n);
    Tree::new(config).unwrap()
}

#[test]
fn test_full_walk_ascending() {
    let tree = tree_with_capacity(8);
    for k in 1..=50i64 {
        tree.insert(k, k as u64).unwrap();
    }
    let mut it = tree.iter().unwrap();
    it.seek_to_first().unwrap();
    let mut got = Vec::new();
    while it.valid() {
        got.push((it.key().unwrap(), it.value().unwrap()));
        it.next().unwrap();
    }
    let want: Vec<(i64, u64)> = (1..=50).map(|k| (k, k as u64)).collect();
    assert_eq!(got, want);
}

#[test]
fn test_seek_to_last() {
    let tree = tree_with_capacity(8);
    for k in 1..=50i64 {
        tree.insert(k, k as u64).unwrap();
    }
    let mut it = tree.iter().unwrap();
    it.seek_to_last().unwrap();
    assert!(it.valid());
    assert_eq!(it.key(), Some(50));
}

#[test]
fn test_seek_finds_ceiling() {
    let tree = tree_with_capacity(8);
    for k in [1, 5, 10, 20, 30i64] {
        tree.insert(k, k as u64).unwrap();
    }
    let mut it = tree.iter().unwrap();
    it.seek(6).unwrap();
    assert_eq!(it.key(), Some(10));
}

#[test]
fn test_prev_within_leaf_only() {
    let tree = tree_with_capacity(64);
    for k in 1..=5i64 {
        tree.insert(k, k as u64).unwrap();
    }
    let mut it = tree.iter().unwrap();
    it.seek(3).unwrap();
    assert_eq!(it.key(), Some(3));
    it.prev().unwrap();
    assert_eq!(it.key(), Some(2));
}
