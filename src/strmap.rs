//! Sidecar mapping from the original string form of a key to the `i64`
//! actually stored in the tree, for the string-keyed insert overload.

use std::collections::BTreeMap;
use std::sync::RwLock;

/// Deterministic 64-bit hash used to turn a string key into the `i64` the
/// tree actually indexes on. Not cryptographic; collisions are possible
/// and out of scope (the hashing of string keys to sub-memtable indices
/// is explicitly an external collaborator per the purpose statement).
pub fn hash64(s: &str) -> i64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    s.hash(&mut hasher);
    hasher.finish() as i64
}

/// Records which original string produced which `i64` key.
pub(crate) struct StringIndex {
    table: RwLock<BTreeMap<i64, String>>,
}

impl StringIndex {
    pub fn new() -> StringIndex {
        StringIndex {
            table: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn record(&self, key: i64, original: String) {
        self.table.write().unwrap().insert(key, original);
    }

    pub fn lookup(&self, key: i64) -> Option<String> {
        self.table.read().unwrap().get(&key).cloned()
    }
}

#[cfg(test)]
#[path = "strmap_test.rs"]
mod strmap_test;
