//! [Tree]: root ownership, top-down routing, and the internal-insert path
//! that propagates splits upward without parent pointers.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, RwLock,
};

use log::{debug, trace};

use crate::{
    config::{Config, Stats},
    deferred::DeferredSplitQueue,
    node::{Link, Node, Payload, StoreLink, StoreOutcome},
    strmap::StringIndex,
    Result,
};

/// A concurrent FAST-and-FAIR B+-tree keyed by `i64`, storing opaque
/// pointer-sized payloads.
///
/// No parent pointers are kept anywhere in this structure — splits
/// propagate upward by re-descending from the root via
/// [Tree::internal_insert], matching the right-link / B-link discipline
/// described for [Node].
pub struct Tree {
    pub(crate) config: Config,
    root: RwLock<Arc<Node>>,
    height: AtomicUsize,
    in_compact: std::sync::atomic::AtomicBool,
    pub(crate) pending: DeferredSplitQueue,
    pub(crate) string_map: StringIndex,
}

impl Tree {
    /// Create a new, empty tree with the given configuration.
    pub fn new(config: Config) -> Result<Tree> {
        config.validate()?;
        let root = Node::new_leaf(config.node_capacity);
        Ok(Tree {
            config,
            root: RwLock::new(root),
            height: AtomicUsize::new(0),
            in_compact: std::sync::atomic::AtomicBool::new(false),
            pending: DeferredSplitQueue::new(),
            string_map: StringIndex::new(),
        })
    }

    /// Insert `(key, value)`. Re-inserting an existing key overwrites its
    /// slot in place rather than adding a second one, so a leaf never
    /// carries more than one slot per key and readers never observe
    /// duplicates, matching the "idempotent re-insert" property tests.
    pub fn insert(&self, key: i64, value: Payload) -> Result<()> {
        loop {
            let leaf = self.descend_to_leaf(key)?;
            let allow_deferred = self.in_compact.load(Ordering::SeqCst);
            match Node::store(&leaf, key, StoreLink::Value(value), &self.config, allow_deferred)? {
                StoreOutcome::Retry => {
                    trace!("insert({}) hit a tombstoned leaf, restarting from root", key);
                    continue;
                }
                StoreOutcome::Placed { split } => {
                    if allow_deferred {
                        self.maybe_enqueue_pending(&leaf);
                    }
                    if let Some((sep_key, sibling)) = split {
                        self.propagate_split(&leaf, sep_key, sibling)?;
                    }
                    return Ok(());
                }
            }
        }
    }

    /// Insert a string-keyed entry: the key used in the tree is
    /// `hash64(s)`; the original string is recorded in the sidecar map so
    /// [Tree::get_mapping] can recover it.
    pub fn insert_str(&self, s: &str, value: Payload) -> Result<()> {
        let key = crate::strmap::hash64(s);
        self.string_map.record(key, s.to_string());
        self.insert(key, value)
    }

    /// Point lookup. `None` on a clean miss.
    pub fn search(&self, key: i64) -> Result<Option<Payload>> {
        let leaf = self.descend_to_leaf(key)?;
        match leaf.linear_search(key, self.config.switch_retry_limit)? {
            Link::Value(v) => Ok(Some(v)),
            _ => Ok(None),
        }
    }

    /// Recover the original string recorded by [Tree::insert_str], if any.
    pub fn get_mapping(&self, key: i64) -> Option<String> {
        self.string_map.lookup(key)
    }

    /// Tombstone-only delete: the entry is removed from its leaf; the
    /// tree's shape is never rebalanced (delete-rebalancing is
    /// deliberately disabled, per the contract).
    pub fn delete(&self, key: i64) -> Result<()> {
        let leaf = self.descend_to_leaf(key)?;
        leaf.remove(key, &self.config);
        Ok(())
    }

    /// Strict range scan: every value whose key `k` satisfies
    /// `min < k < max`, in ascending key order.
    pub fn range(&self, min: i64, max: i64) -> Result<Vec<Payload>> {
        let mut it = self.iter()?;
        it.seek(min)?;
        let mut out = Vec::new();
        while it.valid() {
            let k = it.key().expect("valid iterator has a key");
            if k >= max {
                break;
            }
            if k > min {
                out.push(it.value().expect("valid iterator has a value"));
            }
            it.next()?;
        }
        Ok(out)
    }

    /// New cursor positioned before the first entry; call `seek_to_first`
    /// or `seek` to position it.
    pub fn iter(&self) -> Result<crate::iter::Iter> {
        crate::iter::Iter::new(self)
    }

    /// Enable/disable deferred-split (bulk-load) mode. Callers must not
    /// issue reads while `in_compact` is true and must call
    /// [Tree::resolve_deferred_splits] before clearing it.
    pub fn set_in_compact(&self, enabled: bool) {
        self.in_compact.store(enabled, Ordering::SeqCst);
    }

    pub fn in_compact(&self) -> bool {
        self.in_compact.load(Ordering::SeqCst)
    }

    /// Resolve every pending extend chain into real FAIR splits,
    /// propagating separators upward. Precondition: no concurrent
    /// writers (enforced by caller discipline, not by this function).
    pub fn resolve_deferred_splits(&self) -> Result<()> {
        debug!("resolving deferred splits");
        crate::deferred::resolve_deferred_splits(self)
    }

    /// Total number of live entries across all leaves.
    pub fn len(&self) -> Result<usize> {
        let mut leaf = self.leftmost_leaf();
        let mut total = 0;
        loop {
            total += leaf.count(self.config.switch_retry_limit)?;
            match leaf.sibling() {
                Some(next) => leaf = next,
                None => break,
            }
        }
        Ok(total)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Snapshot statistics: height, node/leaf counts, entry count.
    pub fn to_stats(&self) -> Result<Stats> {
        let mut stats = Stats::from(self.config.clone());
        stats.height = self.height.load(Ordering::SeqCst);
        let (n_nodes, n_leaves) = self.count_nodes(&self.root.read().unwrap().clone());
        stats.n_nodes = n_nodes;
        stats.n_leaves = n_leaves;
        stats.n_entries = self.len()?;
        Ok(stats)
    }

    fn count_nodes(&self, node: &Arc<Node>) -> (usize, usize) {
        if node.is_leaf() {
            (1, 1)
        } else {
            let mut nodes = 1;
            let mut leaves = 0;
            for child in node.children() {
                let (n, l) = self.count_nodes(&child);
                nodes += n;
                leaves += l;
            }
            (nodes, leaves)
        }
    }

    /// Walk the whole tree checking the structural invariants from the
    /// testable-properties list: sort order within nodes, sibling
    /// key ordering, and (for internal nodes) child key-range coverage.
    pub fn validate(&self) -> Result<()> {
        let root = self.root.read().unwrap().clone();
        self.validate_node(&root, None, None)
    }

    fn validate_node(&self, node: &Arc<Node>, lo: Option<i64>, hi: Option<i64>) -> Result<()> {
        let entries: Vec<i64> = if node.is_leaf() {
            node.entries().into_iter().map(|(k, _)| k).collect()
        } else {
            (0..node.len()).filter_map(|i| node.key_at(i)).collect()
        };
        let mut prev: Option<i64> = None;
        for k in &entries {
            if let Some(p) = prev {
                if *k <= p {
                    return err_at!(Fatal, msg: "keys not strictly ascending: {} <= {}", k, p);
                }
            }
            if let Some(lo) = lo {
                if *k < lo {
                    return err_at!(Fatal, msg: "key {} below subtree lower bound {}", k, lo);
                }
            }
            if let Some(hi) = hi {
                if *k >= hi {
                    return err_at!(Fatal, msg: "key {} at/above subtree upper bound {}", k, hi);
                }
            }
            prev = Some(*k);
        }
        if let Some(sibling) = node.sibling() {
            if let (Some(first), Some(last)) = (sibling_first_key(&sibling), entries.last()) {
                if first < *last {
                    return err_at!(Fatal, msg: "sibling first key {} < this node's max key {}", first, last);
                }
            }
        }

        if !node.is_leaf() {
            let children = node.children();
            let bounds = entries.clone();
            for (i, child) in children.iter().enumerate() {
                let child_lo = if i == 0 { lo } else { Some(bounds[i - 1]) };
                let child_hi = if i < bounds.len() { Some(bounds[i]) } else { hi };
                self.validate_node(child, child_lo, child_hi)?;
            }
        }
        Ok(())
    }

    fn leftmost_leaf(&self) -> Arc<Node> {
        let mut node = self.root.read().unwrap().clone();
        loop {
            match node.leftmost_child() {
                Some(child) => node = child,
                None => {
                    if node.is_leaf() {
                        return node;
                    }
                    // internal node with no leftmost recorded yet (shouldn't
                    // happen once populated); fall back to first child slot.
                    match node.first_child() {
                        Some(child) => node = child,
                        None => return node,
                    }
                }
            }
        }
    }

    pub(crate) fn root_snapshot(&self) -> Arc<Node> {
        self.root.read().unwrap().clone()
    }

    fn is_root(&self, node: &Arc<Node>) -> bool {
        Arc::ptr_eq(&self.root.read().unwrap(), node)
    }

    fn root_level(&self) -> usize {
        self.root.read().unwrap().level
    }

    fn descend_to_leaf(&self, key: i64) -> Result<Arc<Node>> {
        let mut node = self.root.read().unwrap().clone();
        loop {
            if node.is_leaf() {
                return Ok(node);
            }
            node = self.step(&node, key)?;
        }
    }

    fn descend_to_level(&self, key: i64, level: usize) -> Result<Arc<Node>> {
        let mut node = self.root.read().unwrap().clone();
        loop {
            if node.level == level {
                return Ok(node);
            }
            if node.is_leaf() {
                return err_at!(Fatal, msg: "descended past leaf level looking for level {}", level);
            }
            node = self.step(&node, key)?;
        }
    }

    fn step(&self, node: &Arc<Node>, key: i64) -> Result<Arc<Node>> {
        match node.linear_search(key, self.config.switch_retry_limit)? {
            Link::Child(c) => Ok(c),
            _ => err_at!(Fatal, msg: "internal node produced no child routing key {}", key),
        }
    }

    pub(crate) fn propagate_split(
        &self,
        node: &Arc<Node>,
        sep_key: i64,
        sibling: Arc<Node>,
    ) -> Result<()> {
        if self.is_root(node) {
            self.set_new_root(node.clone(), sep_key, sibling, node.level + 1)
        } else {
            self.internal_insert(sep_key, sibling, node.level + 1)
        }
    }

    pub(crate) fn internal_insert(&self, key: i64, child: Arc<Node>, level: usize) -> Result<()> {
        if level > self.root_level() {
            // a concurrent root promotion already accounted for this split.
            return Ok(());
        }
        let node = self.descend_to_level(key, level)?;
        match Node::store(&node, key, StoreLink::Child(child.clone()), &self.config, false)? {
            StoreOutcome::Retry => self.internal_insert(key, child, level),
            StoreOutcome::Placed { split } => {
                if let Some((sep_key, sibling)) = split {
                    self.propagate_split(&node, sep_key, sibling)?;
                }
                Ok(())
            }
        }
    }

    fn set_new_root(
        &self,
        left: Arc<Node>,
        sep_key: i64,
        right: Arc<Node>,
        new_level: usize,
    ) -> Result<()> {
        let mut root_guard = self.root.write().unwrap();
        if !Arc::ptr_eq(&root_guard, &left) {
            // someone else already promoted a new root for this split.
            return Ok(());
        }
        let new_root = Node::new_internal(new_level, self.config.node_capacity, left.clone());
        match Node::store(&new_root, sep_key, StoreLink::Child(right), &self.config, false)? {
            StoreOutcome::Placed { .. } => {}
            StoreOutcome::Retry => {
                return err_at!(Fatal, msg: "freshly allocated root cannot be tombstoned");
            }
        }
        *root_guard = new_root;
        crate::flush::fence_writes(self.config.write_latency_ns);
        self.height.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn maybe_enqueue_pending(&self, leaf: &Arc<Node>) {
        if leaf.extend().is_some() && leaf.mark_pending_enqueued() {
            self.pending.push(leaf.clone());
        }
    }
}

fn sibling_first_key(node: &Arc<Node>) -> Option<i64> {
    node.key_at(0)
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
