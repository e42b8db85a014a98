//! Cache facade: routes every key to exactly one shard

use std::fmt;

use shardstore::{ArenaUsage, BackendKind, Error, Result, Shard, ShardBackend, ShardRouter};
use tracing::{debug, trace};

use crate::config::Config;
use crate::stats::CacheStats;

/// Sharded in-process byte cache
///
/// Keys are hashed once and routed to one of a fixed number of shards; each
/// shard owns its own lock, so operations on different shards never contend.
/// Share a `Cache` between threads with `Arc`.
pub struct Cache {
    /// One entry per shard, indexed by the router
    shards: Box<[Shard]>,

    /// Key hash to shard index
    router: ShardRouter,

    /// Resolved configuration
    config: Config,

    /// Operation counters
    stats: CacheStats,
}

impl Cache {
    /// Create a cache with the default configuration
    /// (256 shards, map backend)
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Create a cache from `config`, resolving zero fields to defaults
    ///
    /// # Returns
    /// * `Err(Error::InvalidConfiguration)` - shard count is not a power of
    ///   two, or the arena cap is below the initial buffer length
    pub fn with_config(config: Config) -> Result<Self> {
        let config = config.resolved();
        config.validate()?;
        let router = ShardRouter::new(config.shard_count)?;
        let options = config.shard_options();

        let shards = (0..router.shard_count())
            .map(|_| Shard::new(config.backend, &options))
            .collect();

        debug!(
            shard_count = config.shard_count,
            backend = %config.backend,
            capacity = config.default_capacity,
            value_buffer_len = config.default_value_buffer_len,
            "cache created"
        );

        Ok(Self {
            shards,
            router,
            config,
            stats: CacheStats::new(),
        })
    }

    /// Associate `value` with `key`, replacing any previous value
    ///
    /// # Returns
    /// * `Err(Error::OutOfCapacity)` - capped arena shard is full
    /// * `Err(Error::ValueTooLarge)` - value too long for an arena record
    pub fn set(&self, key: impl AsRef<[u8]>, value: impl Into<Vec<u8>>) -> Result<()> {
        let (hash, index) = self.router.locate(key.as_ref());
        let evicted = self.shards[index].set(hash, value.into())?;

        self.stats.record_insert();
        if let Some(victim) = evicted {
            self.stats.record_eviction();
            trace!(shard = index, key = victim, "entry evicted");
        }
        Ok(())
    }

    /// Copy of the value associated with `key`
    ///
    /// # Returns
    /// * `Err(Error::NotFound)` - nothing stored under `key`
    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        let (hash, index) = self.router.locate(key.as_ref());
        match self.shards[index].get(hash) {
            Ok(value) => {
                self.stats.record_hit();
                Ok(value)
            }
            Err(Error::NotFound) => {
                self.stats.record_miss();
                Err(Error::NotFound)
            }
            Err(e) => Err(e),
        }
    }

    /// Remove the association for `key`
    ///
    /// Arena shards keep the record bytes; only the index entry goes.
    ///
    /// # Returns
    /// * `true` if `key` was present
    pub fn del(&self, key: impl AsRef<[u8]>) -> bool {
        let (hash, index) = self.router.locate(key.as_ref());
        let existed = self.shards[index].del(hash);
        if existed {
            self.stats.record_delete();
        }
        existed
    }

    /// Whether a value is associated with `key`
    ///
    /// Copies nothing, leaves LRU recency alone and records no hit or miss.
    pub fn contains(&self, key: impl AsRef<[u8]>) -> bool {
        let (hash, index) = self.router.locate(key.as_ref());
        self.shards[index].contains(hash)
    }

    /// Index of the shard `key` routes to
    pub fn shard_for(&self, key: impl AsRef<[u8]>) -> usize {
        self.router.locate(key.as_ref()).1
    }

    /// Total live associations across all shards
    pub fn len(&self) -> usize {
        self.shards.iter().map(ShardBackend::len).sum()
    }

    /// Whether every shard is empty
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(ShardBackend::is_empty)
    }

    /// Number of shards
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Backend used by every shard
    pub fn backend(&self) -> BackendKind {
        self.config.backend
    }

    /// Resolved configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Operation counters
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Space accounting summed over all arena shards
    ///
    /// `None` unless the backend is [`BackendKind::Arena`].
    pub fn arena_usage(&self) -> Option<ArenaUsage> {
        let mut total = ArenaUsage {
            write_cursor: 0,
            capacity: 0,
            live_records: 0,
        };
        for shard in self.shards.iter() {
            let Shard::Arena(arena) = shard else {
                return None;
            };
            let usage = arena.usage();
            total.write_cursor += usage.write_cursor;
            total.capacity += usage.capacity;
            total.live_records += usage.live_records;
        }
        Some(total)
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("shard_count", &self.shard_count())
            .field("backend", &self.config.backend)
            .field("len", &self.len())
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}
