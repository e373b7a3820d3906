//! Fixed-capacity ring buffer
//!
//! Backing store for both the forensic (black box) and live telemetry buffers.
//! Slots are allocated once up front; when the buffer is full a push overwrites
//! the oldest slot in place.

use std::iter::Chain;
use std::slice;

/// A value carrying a wall-clock timestamp in seconds since the Unix epoch
pub trait Timestamped {
    /// Timestamp in seconds since the Unix epoch
    fn timestamp(&self) -> f64;
}

/// Oldest-first iterator over a [`RingBuffer`]
pub type Iter<'a, T> = Chain<slice::Iter<'a, T>, slice::Iter<'a, T>>;

/// Bounded FIFO buffer that evicts its oldest entry on overflow
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    /// Slot storage, never grows past `capacity`
    slots: Vec<T>,
    /// Index of the oldest entry once the buffer has wrapped
    head: usize,
    /// Maximum number of entries
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Create an empty buffer holding at most `capacity` entries.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    /// Append an entry, evicting the oldest one if the buffer is full
    pub fn push(&mut self, item: T) {
        if self.slots.len() < self.capacity {
            self.slots.push(item);
        } else {
            self.slots[self.head] = item;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    /// Number of entries currently held
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Check if the next push will evict an entry
    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remove all entries. The slot allocation is kept.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = 0;
    }

    /// Iterate oldest-first
    pub fn iter(&self) -> Iter<'_, T> {
        let (newer, older) = self.slots.split_at(self.head);
        older.iter().chain(newer.iter())
    }

    /// The oldest entry
    pub fn oldest(&self) -> Option<&T> {
        self.iter().next()
    }

    /// The most recently pushed entry
    pub fn newest(&self) -> Option<&T> {
        self.iter().next_back()
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Copy the contents out, oldest first
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T: Timestamped + Clone> RingBuffer<T> {
    /// Copy out the entries stamped at or after `cutoff`, oldest first
    pub fn since(&self, cutoff: f64) -> Vec<T> {
        self.iter()
            .filter(|entry| entry.timestamp() >= cutoff)
            .cloned()
            .collect()
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
