//! Tunable parameters for a [Tree](crate::tree::Tree).
//!
//! Configuration is supplied once, at construction, and frozen for the
//! lifetime of the tree — there is no support for reconfiguring a live
//! tree, the way an on-disk index's build-time configuration is only
//! consulted while building the index, never afterwards.

/// Default number of key slots per node.
///
/// Sized so that a node plus its header fits a handful of cache lines;
/// callers tune this to their NVM page size via [Config::set_node_capacity].
pub const NODE_CAPACITY: usize = 64;

/// Default switch-counter retry budget for a reader chasing sibling links
/// across a concurrent split before giving up and restarting from the root.
pub const SWITCH_RETRY_LIMIT: usize = 8;

/// Default emulated NVM write latency, in nanoseconds, applied by
/// [fence_writes](crate::flush::fence_writes) after every durability point.
pub const WRITE_LATENCY_NS: u64 = 0;

/// Default cache line size, in bytes, used to compute how many
/// `clflush`-equivalent fence operations a node write requires.
pub const CACHE_LINE_SIZE: usize = 64;

/// Configuration for a [Tree](crate::tree::Tree).
#[derive(Clone, Debug)]
pub struct Config {
    /// Number of key slots per node (leaf and internal).
    ///
    /// Default: [NODE_CAPACITY]
    pub node_capacity: usize,
    /// Number of sibling hops a reader will chase before retrying from
    /// the root.
    ///
    /// Default: [SWITCH_RETRY_LIMIT]
    pub switch_retry_limit: usize,
    /// Emulated write latency applied at every durability fence.
    ///
    /// Default: [WRITE_LATENCY_NS]
    pub write_latency_ns: u64,
    /// Cache line size assumed by the flush discipline.
    ///
    /// Default: [CACHE_LINE_SIZE]
    pub cache_line_size: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            node_capacity: NODE_CAPACITY,
            switch_retry_limit: SWITCH_RETRY_LIMIT,
            write_latency_ns: WRITE_LATENCY_NS,
            cache_line_size: CACHE_LINE_SIZE,
        }
    }
}

impl Config {
    /// Create a new configuration, use the `set_*` methods to customise it.
    pub fn new() -> Config {
        Config::default()
    }

    /// Set the number of key slots per node. Must be at least 2, since a
    /// node cannot usefully split below that.
    pub fn set_node_capacity(&mut self, capacity: usize) -> &mut Self {
        self.node_capacity = capacity;
        self
    }

    /// Set the sibling-chase retry budget before a reader falls back to
    /// restarting its traversal from the root.
    pub fn set_switch_retry_limit(&mut self, limit: usize) -> &mut Self {
        self.switch_retry_limit = limit;
        self
    }

    /// Set the emulated per-fence write latency.
    pub fn set_write_latency_ns(&mut self, ns: u64) -> &mut Self {
        self.write_latency_ns = ns;
        self
    }

    /// Set the cache line size assumed when counting flush operations.
    pub fn set_cache_line_size(&mut self, size: usize) -> &mut Self {
        self.cache_line_size = size;
        self
    }

    pub(crate) fn validate(&self) -> crate::Result<()> {
        if self.node_capacity < 2 {
            return err_at!(InvalidConfig, msg: "node_capacity must be >= 2, got {}", self.node_capacity);
        }
        if self.cache_line_size == 0 {
            return err_at!(InvalidConfig, msg: "cache_line_size must be non-zero");
        }
        Ok(())
    }
}

/// Read-only statistics snapshot of a [Tree](crate::tree::Tree).
#[derive(Clone, Default, Debug)]
pub struct Stats {
    /// Height of the tree, counting the root as level 0.
    pub height: usize,
    /// Total number of nodes, leaf and internal.
    pub n_nodes: usize,
    /// Total number of leaf nodes.
    pub n_leaves: usize,
    /// Total number of live (non-tombstoned) entries.
    pub n_entries: usize,
    /// Node capacity this tree was built with.
    pub node_capacity: usize,
}

impl From<Config> for Stats {
    fn from(config: Config) -> Stats {
        Stats {
            height: 0,
            n_nodes: 0,
            n_leaves: 0,
            n_entries: 0,
            node_capacity: config.node_capacity,
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
