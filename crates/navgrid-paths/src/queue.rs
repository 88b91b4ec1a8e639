//! Indexed binary min-heap with decrease/increase-key.
//!
//! Items are stored in a flat heap array; an auxiliary map records each
//! item's slot so membership tests are O(1) and priority updates can sift
//! from the right place. Every swap updates both moved items' slots.

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Contract violations on [`IndexedPriorityQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// `enqueue` was called for an item already in the queue.
    DuplicateItem,
    /// `dequeue` or `peek` on an empty queue.
    EmptyQueue,
    /// `update_priority` for an item not in the queue.
    ItemNotFound,
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateItem => f.write_str("item is already in the queue"),
            Self::EmptyQueue => f.write_str("the priority queue is empty"),
            Self::ItemNotFound => f.write_str("item is not in the queue"),
        }
    }
}

impl std::error::Error for QueueError {}

/// A min-priority queue supporting membership tests and priority updates.
#[derive(Debug, Clone)]
pub struct IndexedPriorityQueue<T, P> {
    heap: Vec<(T, P)>,
    slots: FxHashMap<T, usize>,
}

impl<T, P> Default for IndexedPriorityQueue<T, P>
where
    T: Eq + Hash + Clone,
    P: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P> IndexedPriorityQueue<T, P>
where
    T: Eq + Hash + Clone,
    P: Ord,
{
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            slots: FxHashMap::default(),
        }
    }

    /// Create an empty queue with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            slots: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Number of queued items.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Whether `item` is queued.
    #[inline]
    pub fn contains(&self, item: &T) -> bool {
        self.slots.contains_key(item)
    }

    /// Current priority of `item`, if queued.
    pub fn priority_of(&self, item: &T) -> Option<&P> {
        self.slots.get(item).map(|&i| &self.heap[i].1)
    }

    /// Insert `item`. Use [`update_priority`](Self::update_priority) for
    /// items already present.
    pub fn enqueue(&mut self, item: T, priority: P) -> Result<(), QueueError> {
        if self.slots.contains_key(&item) {
            return Err(QueueError::DuplicateItem);
        }
        let slot = self.heap.len();
        self.slots.insert(item.clone(), slot);
        self.heap.push((item, priority));
        self.sift_up(slot);
        Ok(())
    }

    /// Remove and return the item with the lowest priority.
    pub fn dequeue(&mut self) -> Result<T, QueueError> {
        if self.heap.is_empty() {
            return Err(QueueError::EmptyQueue);
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let Some((item, _)) = self.heap.pop() else {
            return Err(QueueError::EmptyQueue);
        };
        self.slots.remove(&item);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Ok(item)
    }

    /// The item with the lowest priority, without removing it.
    pub fn peek(&self) -> Result<&T, QueueError> {
        self.heap
            .first()
            .map(|(item, _)| item)
            .ok_or(QueueError::EmptyQueue)
    }

    /// Change the priority of a queued item. The new priority may be higher
    /// or lower than the old one.
    pub fn update_priority(&mut self, item: &T, priority: P) -> Result<(), QueueError> {
        let Some(&slot) = self.slots.get(item) else {
            return Err(QueueError::ItemNotFound);
        };
        self.heap[slot].1 = priority;
        let slot = self.sift_up(slot);
        self.sift_down(slot);
        Ok(())
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.slots.clear();
    }

    // -----------------------------------------------------------------------
    // Heap maintenance
    // -----------------------------------------------------------------------

    /// Move the entry at `i` towards the root; returns its final slot.
    fn sift_up(&mut self, mut i: usize) -> usize {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.heap[i].1 >= self.heap[parent].1 {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
        i
    }

    /// Move the entry at `i` towards the leaves; returns its final slot.
    fn sift_down(&mut self, mut i: usize) -> usize {
        let len = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;
            if left < len && self.heap[left].1 < self.heap[smallest].1 {
                smallest = left;
            }
            if right < len && self.heap[right].1 < self.heap[smallest].1 {
                smallest = right;
            }
            if smallest == i {
                return i;
            }
            self.swap(i, smallest);
            i = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        if let Some(slot) = self.slots.get_mut(&self.heap[a].0) {
            *slot = a;
        }
        if let Some(slot) = self.slots.get_mut(&self.heap[b].0) {
            *slot = b;
        }
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        assert_eq!(self.heap.len(), self.slots.len());
        for (i, (item, p)) in self.heap.iter().enumerate() {
            assert_eq!(self.slots[item], i, "slot map out of sync at {i}");
            if i > 0 {
                assert!(self.heap[(i - 1) / 2].1 <= *p, "heap order violated at {i}");
            }
        }
    }
}
