//! `fftree` is a concurrent, persistent-memory-oriented B+-tree used as
//! the indexing substrate of a log-structured key-value store's
//! in-memory/persistent table tier.
//!
//! Keys are fixed-width 64-bit integers (with an auxiliary mapping from
//! opaque byte strings to integer keys, see [strmap]); values are opaque
//! pointer-sized payloads. The tree implements the FAST-and-FAIR write
//! protocol — in-place shifts ordered so concurrent lock-free readers
//! never observe a torn entry, and splits linked via right-pointers so a
//! reader racing a split simply follows the link — plus a
//! compaction-aware deferred-split mode for bulk loading.
//!
//! Out of scope: the enclosing store's memtable ref-counting and WAL,
//! the arena/slab allocator, the bloom-filter layer, and the outer
//! compaction iterator — all external collaborators. Variable-length
//! in-node keys, crash-safe structural recovery, multi-writer scaling
//! beyond per-node mutexes, and delete rebalancing are deliberate
//! non-goals.

#[macro_use]
mod error;

pub mod config;
pub mod deferred;
pub mod flush;
pub mod iter;
pub mod node;
pub mod strmap;
pub mod tree;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::iter::Iter;
pub use crate::node::Payload;
pub use crate::tree::Tree;
