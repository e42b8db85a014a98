//! LRU (Least Recently Used) shard
//!
//! Nodes live in a slab and link to each other by index, so the map and the
//! recency list never alias a node. Both are only touched under one mutex:
//! `get` relinks nodes and needs the same exclusion as `set`.

use std::collections::HashMap;

use ahash::RandomState;
use parking_lot::Mutex;
use tracing::trace;

use crate::error::{Error, Result};
use crate::hash::HashedKey;
use crate::shard::ShardBackend;

/// Node in the recency list
struct Node {
    key: HashedKey,
    value: Vec<u8>,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Index-linked recency list plus its key map
///
/// Front (`head`) is the most recently touched entry, back (`tail`) the
/// least recently touched one.
struct LruList {
    map: HashMap<HashedKey, usize, RandomState>,
    nodes: Vec<Option<Node>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    max_size: usize,
}

impl LruList {
    fn new(max_size: usize) -> Self {
        Self {
            map: HashMap::with_hasher(RandomState::new()),
            nodes: Vec::new(),
            head: None,
            tail: None,
            free_list: Vec::new(),
            max_size,
        }
    }

    fn get(&mut self, key: HashedKey) -> Option<&[u8]> {
        let idx = *self.map.get(&key)?;
        self.move_to_front(idx);
        self.nodes[idx].as_ref().map(|node| node.value.as_slice())
    }

    /// Insert or update, returning the key evicted to respect `max_size`
    fn put(&mut self, key: HashedKey, value: Vec<u8>) -> Option<HashedKey> {
        if let Some(&idx) = self.map.get(&key) {
            if let Some(node) = &mut self.nodes[idx] {
                node.value = value;
            }
            self.move_to_front(idx);
            return None;
        }

        let idx = self.alloc_node();
        self.nodes[idx] = Some(Node {
            key,
            value,
            prev: None,
            next: self.head,
        });
        self.link_front(idx);
        self.map.insert(key, idx);

        if self.max_size != 0 && self.map.len() > self.max_size {
            self.evict()
        } else {
            None
        }
    }

    fn remove(&mut self, key: HashedKey) -> Option<Vec<u8>> {
        let idx = self.map.remove(&key)?;
        self.unlink(idx);
        self.free_node(idx);
        self.nodes[idx].take().map(|node| node.value)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn link_front(&mut self, idx: usize) {
        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }

        self.unlink(idx);

        if let Some(node) = &mut self.nodes[idx] {
            node.prev = None;
            node.next = self.head;
        }

        self.link_front(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match &self.nodes[idx] {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.nodes[prev_idx] {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.nodes[next_idx] {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    fn evict(&mut self) -> Option<HashedKey> {
        let tail_idx = self.tail?;
        self.unlink(tail_idx);
        self.free_node(tail_idx);
        let node = self.nodes[tail_idx].take()?;
        self.map.remove(&node.key);
        Some(node.key)
    }

    fn alloc_node(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(None);
            idx
        }
    }

    fn free_node(&mut self, idx: usize) {
        self.free_list.push(idx);
    }

    /// Keys from most to least recently touched
    #[cfg(test)]
    fn keys_by_recency(&self) -> Vec<HashedKey> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let node = self.nodes[idx].as_ref().expect("linked node is live");
            keys.push(node.key);
            cursor = node.next;
        }
        keys
    }
}

/// Shard bounded to `max_size` entries, evicting the least recently used
pub struct LruShard {
    inner: Mutex<LruList>,
}

impl LruShard {
    /// Create a shard holding at most `max_size` entries (0 = unbounded)
    pub fn new(max_size: usize) -> Self {
        Self {
            inner: Mutex::new(LruList::new(max_size)),
        }
    }

    /// Configured entry bound (0 = unbounded)
    pub fn max_size(&self) -> usize {
        self.inner.lock().max_size
    }
}

impl ShardBackend for LruShard {
    fn set(&self, key: HashedKey, value: Vec<u8>) -> Result<Option<HashedKey>> {
        let evicted = self.inner.lock().put(key, value);
        if let Some(victim) = evicted {
            trace!(key = victim, "evicted least recently used entry");
        }
        Ok(evicted)
    }

    fn get(&self, key: HashedKey) -> Result<Vec<u8>> {
        let mut list = self.inner.lock();
        list.get(key).map(<[u8]>::to_vec).ok_or(Error::NotFound)
    }

    fn del(&self, key: HashedKey) -> bool {
        self.inner.lock().remove(key).is_some()
    }

    fn contains(&self, key: HashedKey) -> bool {
        self.inner.lock().map.contains_key(&key)
    }

    fn len(&self) -> usize {
        self.inner.lock().len()
    }
}

impl std::fmt::Debug for LruShard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let list = self.inner.lock();
        f.debug_struct("LruShard")
            .field("len", &list.len())
            .field("max_size", &list.max_size)
            .finish()
    }
}
