//! Hash-map shard: owned values, no ordering, no bound

use std::collections::HashMap;

use ahash::RandomState;
use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::hash::HashedKey;
use crate::shard::ShardBackend;

/// Shard storing each value as its own heap allocation
#[derive(Debug, Default)]
pub struct MapShard {
    items: RwLock<HashMap<HashedKey, Vec<u8>, RandomState>>,
}

impl MapShard {
    /// Create an empty map shard
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShardBackend for MapShard {
    fn set(&self, key: HashedKey, value: Vec<u8>) -> Result<Option<HashedKey>> {
        self.items.write().insert(key, value);
        Ok(None)
    }

    fn get(&self, key: HashedKey) -> Result<Vec<u8>> {
        self.items.read().get(&key).cloned().ok_or(Error::NotFound)
    }

    fn del(&self, key: HashedKey) -> bool {
        self.items.write().remove(&key).is_some()
    }

    fn contains(&self, key: HashedKey) -> bool {
        self.items.read().contains_key(&key)
    }

    fn len(&self) -> usize {
        self.items.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_basic() {
        let shard = MapShard::new();
        shard.set(1, b"one".to_vec()).unwrap();
        shard.set(2, b"two".to_vec()).unwrap();

        assert_eq!(shard.get(1).unwrap(), b"one");
        assert_eq!(shard.get(2).unwrap(), b"two");
        assert_eq!(shard.len(), 2);
    }

    #[test]
    fn test_map_missing() {
        let shard = MapShard::new();
        assert_eq!(shard.get(42), Err(Error::NotFound));
        assert!(!shard.del(42));
    }

    #[test]
    fn test_map_overwrite() {
        let shard = MapShard::new();
        shard.set(1, b"a".to_vec()).unwrap();
        shard.set(1, b"b".to_vec()).unwrap();

        assert_eq!(shard.get(1).unwrap(), b"b");
        assert_eq!(shard.len(), 1);
    }

    #[test]
    fn test_map_delete() {
        let shard = MapShard::new();
        shard.set(1, b"a".to_vec()).unwrap();

        assert!(shard.del(1));
        assert!(!shard.del(1));
        assert_eq!(shard.get(1), Err(Error::NotFound));
        assert!(shard.is_empty());
    }

    #[test]
    fn test_map_contains() {
        let shard = MapShard::new();
        shard.set(1, b"a".to_vec()).unwrap();
        assert!(shard.contains(1));
        assert!(!shard.contains(2));
    }

    #[test]
    fn test_map_empty_value() {
        let shard = MapShard::new();
        shard.set(9, Vec::new()).unwrap();
        assert_eq!(shard.get(9).unwrap(), Vec::<u8>::new());
    }
}
