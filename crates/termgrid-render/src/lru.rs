//! A bounded, thread-safe LRU cache.
//!
//! Per the concurrency model, the LRU is the one core component required
//! to be safe for concurrent use across threads — everything else in this
//! workspace is single-threaded and serialized by its caller. The recency
//! list is an arena of indices rather than a pointer graph: nodes live in a
//! `Vec` slot and are linked via `prev`/`next` indices, with a free list of
//! vacated slots reused by later insertions.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;

const NIL: usize = usize::MAX;

struct Node<K, V> {
    key: K,
    value: V,
    prev: usize,
    next: usize,
}

struct Inner<K, V> {
    capacity: usize,
    nodes: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    index: HashMap<K, usize>,
    head: usize,
    tail: usize,
}

impl<K: Eq + Hash + Clone, V> Inner<K, V> {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            nodes: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
            head: NIL,
            tail: NIL,
        }
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = {
            let n = self.nodes[slot].as_ref().unwrap();
            (n.prev, n.next)
        };
        if prev != NIL {
            self.nodes[prev].as_mut().unwrap().next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.nodes[next].as_mut().unwrap().prev = prev;
        } else {
            self.tail = prev;
        }
    }

    fn push_front(&mut self, slot: usize) {
        let old_head = self.head;
        {
            let n = self.nodes[slot].as_mut().unwrap();
            n.prev = NIL;
            n.next = old_head;
        }
        if old_head != NIL {
            self.nodes[old_head].as_mut().unwrap().prev = slot;
        }
        self.head = slot;
        if self.tail == NIL {
            self.tail = slot;
        }
    }

    fn touch(&mut self, slot: usize) {
        if self.head == slot {
            return;
        }
        self.unlink(slot);
        self.push_front(slot);
    }

    /// Removes and returns the least-recently-used key/value, if any.
    fn evict_lru(&mut self) -> Option<(K, V)> {
        if self.tail == NIL {
            return None;
        }
        let slot = self.tail;
        self.unlink(slot);
        let node = self.nodes[slot].take().unwrap();
        self.index.remove(&node.key);
        self.free.push(slot);
        Some((node.key, node.value))
    }

    fn alloc(&mut self, key: K, value: V) -> usize {
        let node = Node {
            key,
            value,
            prev: NIL,
            next: NIL,
        };
        if let Some(slot) = self.free.pop() {
            self.nodes[slot] = Some(node);
            slot
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }
}

/// A bounded key-to-value cache with recency eviction.
///
/// All operations acquire an internal mutex and complete in amortized
/// `O(1)`. `capacity == 0` is legal and means `add` always evicts: nothing
/// is ever actually retained.
pub struct Lru<K, V> {
    inner: Mutex<Inner<K, V>>,
}

impl<K: Eq + Hash + Clone, V: Clone> Lru<K, V> {
    /// Creates a cache holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::new(capacity)),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.lock().unwrap().capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up `key`, marking it most-recently-used on a hit. A miss
    /// leaves recency order untouched.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock().unwrap();
        let slot = *inner.index.get(key)?;
        inner.touch(slot);
        Some(inner.nodes[slot].as_ref().unwrap().value.clone())
    }

    /// Inserts or updates `key` with `value`, moving it to most-recent.
    ///
    /// Returns `true` if inserting pushed the cache past capacity and an
    /// entry was evicted (the new entry itself, when `capacity == 0`).
    /// Updating an existing key never evicts.
    pub fn add(&self, key: K, value: V) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if let Some(&slot) = inner.index.get(&key) {
            inner.nodes[slot].as_mut().unwrap().value = value;
            inner.touch(slot);
            return false;
        }

        let slot = inner.alloc(key.clone(), value);
        inner.index.insert(key, slot);
        inner.push_front(slot);

        if inner.len() > inner.capacity {
            inner.evict_lru();
            true
        } else {
            false
        }
    }
}
