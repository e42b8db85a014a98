//! Shard capability trait and backend dispatch
//!
//! Every backend owns its own lock; callers share shards by `&self`.

use std::fmt;
use std::str::FromStr;

use crate::arena::ArenaShard;
use crate::error::{Error, Result};
use crate::hash::HashedKey;
use crate::lru::LruShard;
use crate::map::MapShard;

/// Operations every shard backend supports
pub trait ShardBackend: Send + Sync {
    /// Associate `value` with `key`, replacing any previous value
    ///
    /// # Returns
    /// * `Ok(Some(evicted))` - key dropped to stay within a size bound
    /// * `Ok(None)` - nothing was evicted
    fn set(&self, key: HashedKey, value: Vec<u8>) -> Result<Option<HashedKey>>;

    /// Copy of the value currently associated with `key`
    fn get(&self, key: HashedKey) -> Result<Vec<u8>>;

    /// Drop the association for `key`; `true` if it existed
    fn del(&self, key: HashedKey) -> bool;

    /// Whether `key` has a value, without copying it or touching recency
    fn contains(&self, key: HashedKey) -> bool;

    /// Number of live associations
    fn len(&self) -> usize;

    /// Whether the shard holds no associations
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Storage strategy used by every shard of a cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum BackendKind {
    /// Unbounded hash map of owned values
    #[default]
    Map,
    /// Hash map plus recency list, bounded by a maximum entry count
    Lru,
    /// Append-only byte buffer of length-prefixed records
    #[cfg_attr(feature = "serde", serde(alias = "byte"))]
    Arena,
}

impl BackendKind {
    /// Lowercase name, as accepted by [`FromStr`]
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Map => "map",
            BackendKind::Lru => "lru",
            BackendKind::Arena => "arena",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "map" => Ok(BackendKind::Map),
            "lru" => Ok(BackendKind::Lru),
            "arena" | "byte" => Ok(BackendKind::Arena),
            other => Err(Error::InvalidConfiguration(format!(
                "unknown backend kind: {}",
                other
            ))),
        }
    }
}

/// Sizing handed to each backend when a shard is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardOptions {
    /// LRU entry bound (0 = unbounded)
    pub capacity: usize,
    /// Initial arena buffer length, also the first growth granularity
    pub value_buffer_len: usize,
    /// Cap on the arena buffer length (0 = unbounded)
    pub max_arena_bytes: usize,
}

/// A shard of one of the three backend kinds
pub enum Shard {
    /// See [`MapShard`]
    Map(MapShard),
    /// See [`LruShard`]
    Lru(LruShard),
    /// See [`ArenaShard`]
    Arena(ArenaShard),
}

impl Shard {
    /// Build an empty shard of the given kind
    pub fn new(kind: BackendKind, options: &ShardOptions) -> Self {
        match kind {
            BackendKind::Map => Shard::Map(MapShard::new()),
            BackendKind::Lru => Shard::Lru(LruShard::new(options.capacity)),
            BackendKind::Arena => Shard::Arena(ArenaShard::with_limit(
                options.value_buffer_len,
                options.max_arena_bytes,
            )),
        }
    }

    /// Which backend this shard uses
    pub fn kind(&self) -> BackendKind {
        match self {
            Shard::Map(_) => BackendKind::Map,
            Shard::Lru(_) => BackendKind::Lru,
            Shard::Arena(_) => BackendKind::Arena,
        }
    }

    fn backend(&self) -> &dyn ShardBackend {
        match self {
            Shard::Map(shard) => shard,
            Shard::Lru(shard) => shard,
            Shard::Arena(shard) => shard,
        }
    }
}

impl ShardBackend for Shard {
    fn set(&self, key: HashedKey, value: Vec<u8>) -> Result<Option<HashedKey>> {
        self.backend().set(key, value)
    }

    fn get(&self, key: HashedKey) -> Result<Vec<u8>> {
        self.backend().get(key)
    }

    fn del(&self, key: HashedKey) -> bool {
        self.backend().del(key)
    }

    fn contains(&self, key: HashedKey) -> bool {
        self.backend().contains(key)
    }

    fn len(&self) -> usize {
        self.backend().len()
    }
}

impl fmt::Debug for Shard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shard")
            .field("kind", &self.kind())
            .field("len", &self.len())
            .finish()
    }
}
