//! Stateful cursor over a [Tree](crate::tree::Tree)'s leaf chain.
//!
//! Intended for quiescent, post-compaction traversal: correctness across
//! concurrent writers is not guaranteed, matching §4.4's stated scope.

use std::sync::Arc;

use crate::{
    node::{Link, Node, Payload},
    tree::Tree,
    Result,
};

/// Cursor positioned at a single `(key, value)` entry within a leaf, or
/// invalid (before the first `seek*` call, or after walking off the end).
pub struct Iter<'a> {
    tree: &'a Tree,
    leaf: Option<Arc<Node>>,
    index: usize,
    valid: bool,
    /// Set once the current entry is known to be the last one reachable;
    /// the *next* call to [Iter::next] invalidates the cursor.
    last: bool,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(tree: &'a Tree) -> Result<Iter<'a>> {
        Ok(Iter {
            tree,
            leaf: None,
            index: 0,
            valid: false,
            last: false,
        })
    }

    /// Descend leftmost to leaf level and position at its first entry.
    pub fn seek_to_first(&mut self) -> Result<()> {
        let mut node = self.tree.root_snapshot();
        while !node.is_leaf() {
            node = match node.leftmost_child().or_else(|| node.first_child()) {
                Some(child) => child,
                None => break,
            };
        }
        self.position_leaf(node, 0)
    }

    /// Descend leftmost, then follow `sibling` links to the rightmost
    /// leaf, positioning at its last entry.
    pub fn seek_to_last(&mut self) -> Result<()> {
        let mut node = self.tree.root_snapshot();
        while !node.is_leaf() {
            node = match node.leftmost_child().or_else(|| node.first_child()) {
                Some(child) => child,
                None => break,
            };
        }
        while let Some(sibling) = node.sibling() {
            node = sibling;
        }
        let last = node.len().saturating_sub(1);
        self.position_leaf(node, last)
    }

    /// Position at the smallest entry with key `>= k`, following sibling
    /// links when `k` falls past the current leaf's range.
    pub fn seek(&mut self, k: i64) -> Result<()> {
        let mut node = self.tree.root_snapshot();
        while !node.is_leaf() {
            match node.linear_search(k, self.tree.config.switch_retry_limit)? {
                Link::Child(c) => node = c,
                _ => break,
            }
        }

        loop {
            let found = (0..node.len())
                .find(|&i| node.key_at(i).map(|nk| nk >= k).unwrap_or(false));
            match found {
                Some(idx) => return self.position_leaf(node, idx),
                None => match node.sibling() {
                    Some(sibling) => node = sibling,
                    None => {
                        self.valid = false;
                        self.leaf = None;
                        return Ok(());
                    }
                },
            }
        }
    }

    fn position_leaf(&mut self, leaf: Arc<Node>, index: usize) -> Result<()> {
        if index < leaf.len() {
            self.last = leaf.sibling().is_none() && index + 1 >= leaf.len();
            self.index = index;
            self.leaf = Some(leaf);
            self.valid = true;
        } else {
            self.valid = false;
            self.leaf = None;
        }
        Ok(())
    }

    pub fn valid(&self) -> bool {
        self.valid
    }

    pub fn key(&self) -> Option<i64> {
        if !self.valid {
            return None;
        }
        self.leaf.as_ref().and_then(|l| l.key_at(self.index))
    }

    pub fn value(&self) -> Option<Payload> {
        if !self.valid {
            return None;
        }
        self.leaf.as_ref().and_then(|l| l.value_at(self.index))
    }

    /// Advance to the next entry, crossing into the sibling leaf if this
    /// one is exhausted.
    pub fn next(&mut self) -> Result<()> {
        if !self.valid {
            return Ok(());
        }
        if self.last {
            self.valid = false;
            return Ok(());
        }
        let leaf = self.leaf.clone().expect("valid cursor has a leaf");
        if self.index + 1 < leaf.len() {
            self.index += 1;
            self.last = leaf.sibling().is_none() && self.index + 1 >= leaf.len();
            Ok(())
        } else {
            match leaf.sibling() {
                Some(sibling) if sibling.len() > 0 => self.position_leaf(sibling, 0),
                _ => {
                    self.valid = false;
                    Ok(())
                }
            }
        }
    }

    /// Decrement within the current leaf. Does not cross leaves
    /// backward — a documented limitation carried over unchanged.
    pub fn prev(&mut self) -> Result<()> {
        if !self.valid {
            return Ok(());
        }
        if self.index == 0 {
            self.valid = false;
            return Ok(());
        }
        self.index -= 1;
        self.last = false;
        Ok(())
    }
}

#[cfg(test)]
#[path = "iter_test.rs"]
mod iter_test;
