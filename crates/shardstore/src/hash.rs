//! Key hashing and shard routing
//!
//! Keys are reduced to a 32-bit [`HashedKey`] once, at the facade. Shards
//! never see the original bytes; two keys with the same hash share a slot.

use crate::error::{Error, Result};

/// 32-bit digest of a key, the only identifier a shard stores
pub type HashedKey = u32;

const OFFSET_BASIS: u32 = 2_166_136_261;
const PRIME: u32 = 16_777_619;

/// Hash a key with the FNV 32-bit parameters.
///
/// Each byte is folded in as `hash = (hash * PRIME) ^ byte`, left to right,
/// with no finalization step.
#[inline]
pub fn fnv32(key: &[u8]) -> HashedKey {
    key.iter().fold(OFFSET_BASIS, |hash, &byte| {
        hash.wrapping_mul(PRIME) ^ u32::from(byte)
    })
}

/// Maps hashed keys onto a fixed, power-of-two number of shards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardRouter {
    mask: u32,
}

impl ShardRouter {
    /// Create a router for `shard_count` shards
    ///
    /// # Returns
    /// * `Err(Error::InvalidConfiguration)` - count is zero, not a power of
    ///   two, or too large to mask a 32-bit hash
    pub fn new(shard_count: usize) -> Result<Self> {
        if shard_count == 0 || !shard_count.is_power_of_two() {
            return Err(Error::InvalidConfiguration(format!(
                "shard count must be a power of two, got {}",
                shard_count
            )));
        }
        let mask = u32::try_from(shard_count - 1).map_err(|_| {
            Error::InvalidConfiguration(format!("shard count {} exceeds 2^32", shard_count))
        })?;
        Ok(Self { mask })
    }

    /// Number of shards this router addresses
    pub fn shard_count(&self) -> usize {
        self.mask as usize + 1
    }

    /// Shard index for an already hashed key
    #[inline]
    pub fn route(&self, hash: HashedKey) -> usize {
        (hash & self.mask) as usize
    }

    /// Hash `key` and return both the digest and its shard index
    #[inline]
    pub fn locate(&self, key: &[u8]) -> (HashedKey, usize) {
        let hash = fnv32(key);
        (hash, self.route(hash))
    }
}
