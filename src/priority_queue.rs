//! A binary max-heap that also records where every item currently lives, so an item can be found
//! by key and re-prioritized in place (decrease-key/increase-key) in logarithmic time.
//!
//! Ordering and identity are supplied separately: `compare` decides which of two items has the
//! higher priority, while `key` extracts the identity used by the reverse index. Two items with the
//! same key are the same logical entry even if their priorities differ.
use core::cmp::Ordering;
use core::fmt;
use fxhash::FxHashMap;
use std::hash::Hash;

use crate::error::QueueError;

/// Returns [Ordering::Greater] if the first item should be polled before the second.
pub type Comparator<T> = fn(&T, &T) -> Ordering;
/// Extracts the identity of an item for the reverse index.
pub type KeyFn<T, K> = fn(&T) -> K;

#[derive(Clone)]
pub struct IndexedPriorityQueue<T, K> {
    heap: Vec<T>,
    slots: FxHashMap<K, usize>,
    key: KeyFn<T, K>,
    compare: Comparator<T>,
}

impl<T: fmt::Debug, K: fmt::Debug> fmt::Debug for IndexedPriorityQueue<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("IndexedPriorityQueue")
            .field("heap", &self.heap)
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}

impl<T: Ord, K: Hash + Eq> IndexedPriorityQueue<T, K> {
    /// Max-heap using the natural ordering of `T`.
    pub fn new(key: KeyFn<T, K>) -> IndexedPriorityQueue<T, K> {
        IndexedPriorityQueue::with_comparator(key, Ord::cmp)
    }
}

impl<T, K: Hash + Eq> IndexedPriorityQueue<T, K> {
    pub fn with_comparator(key: KeyFn<T, K>, compare: Comparator<T>) -> IndexedPriorityQueue<T, K> {
        IndexedPriorityQueue {
            heap: Vec::new(),
            slots: FxHashMap::default(),
            key,
            compare,
        }
    }

    /// Builds a heap from unordered items in linear time. Fails if two items share a key.
    pub fn from_vec(
        items: Vec<T>,
        key: KeyFn<T, K>,
        compare: Comparator<T>,
    ) -> Result<IndexedPriorityQueue<T, K>, QueueError> {
        let mut slots = FxHashMap::default();
        for (ix, item) in items.iter().enumerate() {
            if slots.insert(key(item), ix).is_some() {
                return Err(QueueError::DuplicateKey);
            }
        }
        let mut queue = IndexedPriorityQueue {
            heap: items,
            slots,
            key,
            compare,
        };
        for ix in (0..queue.heap.len() / 2).rev() {
            queue.sift_down(ix);
        }
        Ok(queue)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
    pub fn clear(&mut self) {
        self.heap.clear();
        self.slots.clear();
    }

    /// The highest-priority item, or [None] if the queue is empty.
    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    /// Inserts a new item. An item with the same key must not already be queued; use
    /// [update](Self::update) to change the priority of a queued item.
    pub fn push(&mut self, item: T) -> Result<(), QueueError> {
        let key = (self.key)(&item);
        if self.slots.contains_key(&key) {
            return Err(QueueError::DuplicateKey);
        }
        let ix = self.heap.len();
        self.heap.push(item);
        self.slots.insert(key, ix);
        self.sift_up(ix);
        Ok(())
    }

    /// Removes and returns the highest-priority item, or [None] if the queue is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let item = self.heap.pop()?;
        self.slots.remove(&(self.key)(&item));
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(item)
    }

    /// Replaces the queued item sharing the key of `item` and restores heap order, whichever
    /// direction its priority moved. Returns the replaced item.
    pub fn update(&mut self, item: T) -> Result<T, QueueError> {
        let key = (self.key)(&item);
        let ix = *self.slots.get(&key).ok_or(QueueError::MissingKey)?;
        let previous = std::mem::replace(&mut self.heap[ix], item);
        let ix = self.sift_up(ix);
        self.sift_down(ix);
        Ok(previous)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.contains_key(&(self.key)(item))
    }
    pub fn contains_key(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    /// The queued item sharing the key of `item`. Its priority and payload may differ from the
    /// probe.
    pub fn get(&self, item: &T) -> Option<&T> {
        self.get_by_key(&(self.key)(item))
    }
    pub fn get_by_key(&self, key: &K) -> Option<&T> {
        self.slots.get(key).map(|&ix| &self.heap[ix])
    }

    fn stronger(&self, a: usize, b: usize) -> bool {
        (self.compare)(&self.heap[a], &self.heap[b]) == Ordering::Greater
    }

    fn sift_up(&mut self, mut ix: usize) -> usize {
        while ix > 0 {
            let parent = (ix - 1) / 2;
            if !self.stronger(ix, parent) {
                break;
            }
            self.swap(ix, parent);
            ix = parent;
        }
        ix
    }

    fn sift_down(&mut self, mut ix: usize) -> usize {
        let size = self.heap.len();
        loop {
            let left = 2 * ix + 1;
            let right = left + 1;
            let mut strongest = ix;
            if left < size && self.stronger(left, strongest) {
                strongest = left;
            }
            if right < size && self.stronger(right, strongest) {
                strongest = right;
            }
            if strongest == ix {
                return ix;
            }
            self.swap(ix, strongest);
            ix = strongest;
        }
    }

    /// Every swap rewrites the reverse index of both items.
    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        self.slots.insert((self.key)(&self.heap[a]), a);
        self.slots.insert((self.key)(&self.heap[b]), b);
    }
}
