//! Durability fence: the in-memory stand-in for a cache-line flush plus
//! persistent-memory write-back, bracketing every mutating node write.
//!
//! Durability here is synchronous: every caller that mutates a node's
//! persisted fields fences before the next mutation becomes visible to
//! other threads, rather than batching writes onto a background flusher
//! thread the way an on-disk index typically would.

use std::{
    sync::atomic::{fence, Ordering},
    thread,
    time::Duration,
};

/// Emit a store-store fence and, if `write_latency_ns` is non-zero, block
/// the calling thread for that long to emulate NVM write latency.
///
/// Called after every `store`/`insert_key`/`remove_key`/split that
/// mutates a node's durable fields, per the FAST/FAIR ordering rules.
pub fn fence_writes(write_latency_ns: u64) {
    fence(Ordering::SeqCst);
    if write_latency_ns > 0 {
        thread::sleep(Duration::from_nanos(write_latency_ns));
    }
}

/// Number of cache-line flushes a byte range of `len` bytes requires,
/// given `cache_line_size`. Mirrors the FAST/FAIR convention of flushing
/// one cache line at a time instead of the whole page.
pub fn lines_to_flush(len: usize, cache_line_size: usize) -> usize {
    if len == 0 {
        0
    } else {
        (len + cache_line_size - 1) / cache_line_size
    }
}

#[cfg(test)]
#[path = "flush_test.rs"]
mod flush_test;
