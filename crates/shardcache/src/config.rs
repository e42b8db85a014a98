//! Cache configuration
//!
//! Every field may be left at zero (or omitted when deserializing); zero
//! resolves to the documented default.

use serde::{Deserialize, Serialize};
use shardstore::{BackendKind, Error, Result, ShardOptions};

/// Default number of shards
pub const DEFAULT_SHARD_COUNT: usize = 256;

/// Default LRU bound per shard
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default initial arena buffer length per shard, in bytes
pub const DEFAULT_VALUE_BUFFER_LEN: usize = 5000;

/// Configuration consumed by [`Cache::with_config`](crate::Cache::with_config)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of shards; must be a power of two
    pub shard_count: usize,

    /// Per-shard size hint (the entry bound for the LRU backend)
    pub default_capacity: usize,

    /// Initial arena buffer length per shard, in bytes
    pub default_value_buffer_len: usize,

    /// Storage strategy for every shard
    pub backend: BackendKind,

    /// Cap on each arena buffer, in bytes (0 = unbounded)
    pub max_arena_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shard_count: DEFAULT_SHARD_COUNT,
            default_capacity: DEFAULT_CAPACITY,
            default_value_buffer_len: DEFAULT_VALUE_BUFFER_LEN,
            backend: BackendKind::Map,
            max_arena_bytes: 0,
        }
    }
}

impl Config {
    /// Default configuration using the given backend
    pub fn with_backend(backend: BackendKind) -> Self {
        Self {
            backend,
            ..Self::default()
        }
    }

    /// Replace zero fields with their defaults
    pub fn resolved(mut self) -> Self {
        if self.shard_count == 0 {
            self.shard_count = DEFAULT_SHARD_COUNT;
        }
        if self.default_capacity == 0 {
            self.default_capacity = DEFAULT_CAPACITY;
        }
        if self.default_value_buffer_len == 0 {
            self.default_value_buffer_len = DEFAULT_VALUE_BUFFER_LEN;
        }
        self
    }

    /// Reject settings that cannot be honored
    ///
    /// Shard-count validation lives in the router; this covers an arena cap
    /// smaller than the buffer every shard starts with.
    pub fn validate(&self) -> Result<()> {
        if self.backend == BackendKind::Arena
            && self.max_arena_bytes != 0
            && self.max_arena_bytes < self.default_value_buffer_len
        {
            return Err(Error::InvalidConfiguration(format!(
                "max_arena_bytes {} is below default_value_buffer_len {}",
                self.max_arena_bytes, self.default_value_buffer_len
            )));
        }
        Ok(())
    }

    /// Sizing passed to each shard
    pub fn shard_options(&self) -> ShardOptions {
        ShardOptions {
            capacity: self.default_capacity,
            value_buffer_len: self.default_value_buffer_len,
            max_arena_bytes: self.max_arena_bytes,
        }
    }
}
