//! Byte-arena shard
//!
//! Buffer layout:
//! ```text
//! [len: u32 LE][len bytes] [len: u32 LE][len bytes] ... [free space]
//!                                                       ^ write_cursor
//! ```
//!
//! The buffer is an append-only log. An index maps each hashed key to the
//! offset of its record header. Overwrites append a new record and repoint
//! the index; deletes only drop the index entry. Abandoned records are never
//! compacted or reused, so the buffer only grows.

use std::collections::HashMap;

use ahash::RandomState;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::hash::HashedKey;
use crate::shard::ShardBackend;

/// Length of the record header (u32 little-endian payload length)
pub const HEADER_LEN: usize = 4;

/// Snapshot of an arena's space accounting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaUsage {
    /// Offset of the first free byte
    pub write_cursor: usize,
    /// Current buffer length
    pub capacity: usize,
    /// Records still reachable through the index
    pub live_records: usize,
}

struct ArenaBuffer {
    /// hashed key -> offset of the record header
    key_items: HashMap<HashedKey, usize, RandomState>,
    value_buffer: Vec<u8>,
    write_cursor: usize,
    capacity_hint: usize,
    /// 0 = unbounded
    max_bytes: usize,
}

/// Outcome of one regrowth: final length, last multiplier, step count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Growth {
    capacity: usize,
    multiplier: usize,
    steps: u32,
}

impl ArenaBuffer {
    fn new(initial_len: usize, max_bytes: usize) -> Self {
        let mut initial_len = initial_len.max(1);
        if max_bytes != 0 {
            initial_len = initial_len.min(max_bytes);
        }
        Self {
            key_items: HashMap::with_hasher(RandomState::new()),
            value_buffer: vec![0u8; initial_len],
            write_cursor: 0,
            capacity_hint: initial_len,
            max_bytes,
        }
    }

    fn append(&mut self, key: HashedKey, value: &[u8]) -> Result<()> {
        let payload_len =
            u32::try_from(value.len()).map_err(|_| Error::ValueTooLarge(value.len()))?;
        let needed = HEADER_LEN + value.len();
        let end = self
            .write_cursor
            .checked_add(needed)
            .ok_or(Error::OutOfCapacity {
                needed: usize::MAX,
                limit: self.limit(),
            })?;

        if end > self.value_buffer.len() {
            self.grow(needed, end)?;
        }

        let offset = self.write_cursor;
        self.value_buffer[offset..offset + HEADER_LEN].copy_from_slice(&payload_len.to_le_bytes());
        self.value_buffer[offset + HEADER_LEN..end].copy_from_slice(value);
        self.key_items.insert(key, offset);
        self.write_cursor = end;

        Ok(())
    }

    /// Reallocate so that at least `required` bytes fit.
    fn grow(&mut self, needed: usize, required: usize) -> Result<()> {
        let old_capacity = self.value_buffer.len();
        let growth = self.plan_growth(needed, required)?;

        let mut grown = vec![0u8; growth.capacity];
        grown[..self.write_cursor].copy_from_slice(&self.value_buffer[..self.write_cursor]);
        self.value_buffer = grown;
        self.capacity_hint = growth.capacity;

        debug!(
            old_capacity,
            new_capacity = growth.capacity,
            multiplier = growth.multiplier,
            steps = growth.steps,
            write_cursor = self.write_cursor,
            "arena buffer grown"
        );
        Ok(())
    }

    /// Next buffer length for a record of `needed` bytes ending at `required`.
    ///
    /// Each step multiplies the capacity hint by 2, or by `ratio + 1` when
    /// the record is at least twice the hint, until the record fits. A
    /// capped arena stops at its cap.
    fn plan_growth(&self, needed: usize, required: usize) -> Result<Growth> {
        let limit = self.limit();
        let mut growth = Growth {
            capacity: self.capacity_hint,
            multiplier: 1,
            steps: 0,
        };

        while growth.capacity < required {
            let ratio = needed / growth.capacity;
            growth.multiplier = if ratio <= 1 { 2 } else { ratio + 1 };
            growth.steps += 1;
            growth.capacity = match growth.capacity.checked_mul(growth.multiplier) {
                Some(next) if next <= limit => next,
                _ if required <= limit => limit,
                _ => {
                    warn!(
                        required,
                        limit,
                        write_cursor = self.write_cursor,
                        "arena write refused, capacity exhausted"
                    );
                    return Err(Error::OutOfCapacity {
                        needed: required,
                        limit,
                    });
                }
            };
        }
        Ok(growth)
    }

    fn read(&self, key: HashedKey) -> Result<Vec<u8>> {
        let offset = *self.key_items.get(&key).ok_or(Error::NotFound)?;

        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&self.value_buffer[offset..offset + HEADER_LEN]);
        let len = u32::from_le_bytes(header) as usize;

        let start = offset + HEADER_LEN;
        Ok(self.value_buffer[start..start + len].to_vec())
    }

    fn limit(&self) -> usize {
        if self.max_bytes == 0 {
            usize::MAX
        } else {
            self.max_bytes
        }
    }
}

/// Shard packing every value into one growable byte buffer
pub struct ArenaShard {
    inner: RwLock<ArenaBuffer>,
}

impl ArenaShard {
    /// Create an arena with an initial buffer of `initial_len` bytes and
    /// unbounded growth
    pub fn new(initial_len: usize) -> Self {
        Self::with_limit(initial_len, 0)
    }

    /// Create an arena whose buffer may not grow past `max_bytes`
    /// (0 = unbounded)
    ///
    /// An `initial_len` above the cap is clamped down to it.
    pub fn with_limit(initial_len: usize, max_bytes: usize) -> Self {
        Self {
            inner: RwLock::new(ArenaBuffer::new(initial_len, max_bytes)),
        }
    }

    /// Current space accounting
    pub fn usage(&self) -> ArenaUsage {
        let arena = self.inner.read();
        ArenaUsage {
            write_cursor: arena.write_cursor,
            capacity: arena.value_buffer.len(),
            live_records: arena.key_items.len(),
        }
    }
}

impl ShardBackend for ArenaShard {
    fn set(&self, key: HashedKey, value: Vec<u8>) -> Result<Option<HashedKey>> {
        self.inner.write().append(key, &value)?;
        Ok(None)
    }

    fn get(&self, key: HashedKey) -> Result<Vec<u8>> {
        self.inner.read().read(key)
    }

    fn del(&self, key: HashedKey) -> bool {
        self.inner.write().key_items.remove(&key).is_some()
    }

    fn contains(&self, key: HashedKey) -> bool {
        self.inner.read().key_items.contains_key(&key)
    }

    fn len(&self) -> usize {
        self.inner.read().key_items.len()
    }
}

impl std::fmt::Debug for ArenaShard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArenaShard")
            .field("usage", &self.usage())
            .finish()
    }
}
