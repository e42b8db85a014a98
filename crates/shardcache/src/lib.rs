//! # shardcache
//!
//! Embeddable in-process byte cache, partitioned across independently
//! locked shards.
//!
//! ## Architecture
//! - **Routing**: FNV 32-bit key hash, masked to a power-of-two shard count
//! - **Backends**: hash map, bounded LRU, or append-only byte arena
//! - **Locking**: one lock per shard; LRU reads take it exclusively
//!
//! ```
//! use shardcache::{BackendKind, Cache, Config};
//!
//! let cache = Cache::with_config(Config::with_backend(BackendKind::Lru)).unwrap();
//! cache.set("a", vec![1u8, 2, 3]).unwrap();
//! assert_eq!(cache.get("a").unwrap(), vec![1, 2, 3]);
//! assert!(cache.del("a"));
//! assert!(cache.get("a").unwrap_err().is_not_found());
//! ```

#![warn(missing_docs)]

mod cache;
mod config;
mod stats;

pub use cache::Cache;
pub use config::{Config, DEFAULT_CAPACITY, DEFAULT_SHARD_COUNT, DEFAULT_VALUE_BUFFER_LEN};
pub use shardstore::{ArenaUsage, BackendKind, Error, HashedKey, Result};
pub use stats::{CacheStats, StatsSnapshot};
