use std::fmt;

use tokio::time::Instant;

/// Marker trait for values the collector can retain.
///
/// Payloads are opaque to the collector. They must be `Send + Sync + 'static`
/// because entries are shared through `Arc` between the collector task and
/// every snapshot reader. Implemented automatically for every such type.
pub trait Payload: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Payload for T {}

/// A recorded payload paired with the moment it was recorded.
///
/// Entries are immutable once created and travel as `Arc<Entry<P>>` from
/// the collector's buffers into every [`Snapshot`](crate::Snapshot), so
/// taking a snapshot never clones payloads.
///
/// The timestamp comes from the monotonic Tokio clock, which means it is only
/// meaningful relative to other instants from the same process.
pub struct Entry<P> {
    value: P,
    timestamp: Instant,
}

impl<P> Entry<P> {
    /// Create an entry stamped with the current instant.
    pub fn new(value: P) -> Self {
        Self::with_timestamp(value, Instant::now())
    }

    /// Create an entry with an explicit timestamp.
    pub fn with_timestamp(value: P, timestamp: Instant) -> Self {
        Self { value, timestamp }
    }

    /// Returns a reference to the recorded payload.
    #[inline]
    pub fn value(&self) -> &P {
        &self.value
    }

    /// Returns the instant the entry was recorded at.
    #[inline]
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Consumes the entry, returning the payload.
    pub fn into_value(self) -> P {
        self.value
    }
}

impl<P: PartialEq> PartialEq for Entry<P> {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp && self.value == other.value
    }
}

impl<P: Eq> Eq for Entry<P> {}

impl<P: fmt::Debug> fmt::Debug for Entry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("value", &self.value)
            .field("timestamp", &self.timestamp)
            .finish()
    }
}
