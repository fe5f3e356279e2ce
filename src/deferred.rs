//! `in_compact` extend chains and their resolution back into real splits.
//!
//! During a bulk-load phase a single writer inserts many pre-sorted keys;
//! structural mutations (splits) midway are wasted work. While
//! [Tree::in_compact](crate::tree::Tree::in_compact) is set, a leaf that
//! would normally split instead grows an `extend` chain (see
//! [Node::store](crate::node::Node::store)); this module tracks which
//! chain heads need resolving and performs that resolution.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use crate::{
    node::{Node, StoreLink, StoreOutcome},
    tree::Tree,
    Result,
};

/// FIFO of extend-chain heads awaiting [resolve_deferred_splits].
pub(crate) struct DeferredSplitQueue {
    queue: Mutex<VecDeque<Arc<Node>>>,
}

impl DeferredSplitQueue {
    pub fn new() -> DeferredSplitQueue {
        DeferredSplitQueue {
            queue: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push(&self, head: Arc<Node>) {
        self.queue.lock().unwrap().push_back(head);
    }

    fn drain(&self) -> Vec<Arc<Node>> {
        self.queue.lock().unwrap().drain(..).collect()
    }
}

/// Walk every pending chain head in FIFO order, consuming its extend
/// chain via ordinary FAIR splits and propagating separators upward.
pub(crate) fn resolve_deferred_splits(tree: &Tree) -> Result<()> {
    for head in tree.pending.drain() {
        resolve_chain(tree, head)?;
    }
    Ok(())
}

fn resolve_chain(tree: &Tree, head: Arc<Node>) -> Result<()> {
    let mut current = head.clone();
    loop {
        let next = current.take_extend();
        let extension = match next {
            Some(ext) => ext,
            None => break,
        };

        // Replay the extension node's entries through the ordinary,
        // non-deferred write path: `store` will split `current` (or
        // whichever sibling it has since routed into) via the standard
        // FAIR protocol whenever it fills up, exactly mirroring a
        // steady-state insert stream.
        for (key, value) in extension.entries() {
            loop {
                match Node::store(&current, key, StoreLink::Value(value), &tree.config, false)? {
                    StoreOutcome::Placed { split } => {
                        if let Some((sep_key, sibling)) = split {
                            tree.propagate_split(&current, sep_key, sibling)?;
                        }
                        break;
                    }
                    StoreOutcome::Retry => continue,
                }
            }
        }

        // Advance to H's next extend node (E2, E3, ...) so the whole
        // chain is replayed, not just its immediate extension.
        current = extension;
    }
    head.clear_pending_enqueued();
    Ok(())
}

#[cfg(test)]
#[path = "deferred_test.rs"]
mod deferred_test;
