/// Configuration for a [`Collector`](crate::Collector).
///
/// Controls the per-category buffer capacity and the depth of the command
/// queue feeding the collector's worker. Use the builder pattern to customize,
/// or use [`Default`] for sensible defaults.
///
/// # Examples
///
/// ```rust
/// use letterbox::CollectorConfig;
///
/// let config = CollectorConfig::default()
///     .with_capacity(500)                    // Keep 500 entries per category
///     .with_command_channel_capacity(4096);  // Deeper command queue
///
/// assert_eq!(config.capacity(), 500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollectorConfig {
    /// Maximum entries retained per category. Applied uniformly to all three
    /// categories and fixed for the collector's lifetime.
    /// Must be at least 1.
    /// Default: 100
    capacity: usize,

    /// Buffer size of the command channel between handles and the worker.
    /// When full, `record` waits for space (backpressure towards ingestion).
    /// Default: 1024
    command_channel_capacity: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        CollectorConfig {
            capacity: 100,
            command_channel_capacity: 1024,
        }
    }
}

impl CollectorConfig {
    /// Set the per-category buffer capacity.
    ///
    /// Validated when the collector is created; a capacity of zero makes
    /// [`Collector::new`](crate::Collector::new) fail with
    /// [`Error::InvalidCapacity`](crate::Error::InvalidCapacity).
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Returns the per-category buffer capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Set the buffer size of the command channel.
    pub fn with_command_channel_capacity(mut self, capacity: usize) -> Self {
        self.command_channel_capacity = capacity;
        self
    }

    /// Returns the command channel capacity.
    pub fn command_channel_capacity(&self) -> usize {
        self.command_channel_capacity
    }
}
