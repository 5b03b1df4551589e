use std::{collections::VecDeque, num::NonZeroUsize, sync::Arc};

use tokio::time::Instant;

use crate::Entry;

/// Fixed-capacity FIFO of entries for a single [`Category`](crate::Category).
///
/// Entries are kept oldest to newest. Inserting into a full buffer evicts the
/// single oldest entry first, so the retained entries are always the most
/// recent `capacity` ones, in insertion order. Equal timestamps therefore keep
/// their insertion order as the tie-break.
#[derive(Debug)]
pub(crate) struct CategoryBuffer<P> {
    capacity: NonZeroUsize,
    entries: VecDeque<Arc<Entry<P>>>,
}

impl<P> CategoryBuffer<P> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity.get()),
        }
    }

    /// Appends an entry, returning the evicted one if the buffer was full.
    pub fn insert(&mut self, entry: Arc<Entry<P>>) -> Option<Arc<Entry<P>>> {
        let evicted = if self.entries.len() >= self.capacity.get() {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    pub fn snapshot_newest_first(&self) -> Vec<Arc<Entry<P>>> {
        self.entries.iter().rev().cloned().collect()
    }

    pub fn oldest_timestamp(&self) -> Option<Instant> {
        self.entries.front().map(|e| e.timestamp())
    }

    /// Number of retained entries with `timestamp >= threshold`.
    pub fn count_since(&self, threshold: Instant) -> usize {
        self.entries
            .iter()
            .filter(|e| e.timestamp() >= threshold)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
