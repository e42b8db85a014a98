//! # shardstore
//!
//! Independently locked key-value shards keyed by a 32-bit key hash.
//!
//! ## Backends
//! - **MapShard**: one heap allocation per value, readers share the lock
//! - **LruShard**: index-linked recency list, bounded entry count
//! - **ArenaShard**: length-prefixed records in one append-only buffer
//!
//! [`ShardRouter`] hashes keys with [`fnv32`] and masks the digest down to
//! a power-of-two shard count.

#![warn(missing_docs)]

mod arena;
mod error;
mod hash;
mod lru;
mod map;
mod shard;

pub use arena::{ArenaShard, ArenaUsage, HEADER_LEN};
pub use error::{Error, Result};
pub use hash::{fnv32, HashedKey, ShardRouter};
pub use lru::LruShard;
pub use map::MapShard;
pub use shard::{BackendKind, Shard, ShardBackend, ShardOptions};
