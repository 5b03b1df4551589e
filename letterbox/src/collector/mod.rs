//! The collector: bounded per-category buffers behind a single worker task.
//!
//! # Overview
//!
//! [`Collector::new`] validates the configuration and spawns a worker task
//! that exclusively owns the three category buffers. All operations travel
//! through one ordered command queue, so they are applied in a single total
//! order without locks:
//!
//! - `record` / `clear` are fire-and-forget (they only wait for queue space)
//! - `snapshot`, `calculate_for_window` and `stats` carry a oneshot reply
//!
//! A query always observes a prefix of the `record` calls enqueued before it,
//! never a buffer in the middle of an eviction.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use letterbox::{Category, Collector, CollectorConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> letterbox::Result {
//! let collector = Collector::new(CollectorConfig::default().with_capacity(10))?;
//!
//! collector.record(Category::Unhandled, "ping").await?;
//!
//! let window = collector.calculate_for_window(Duration::from_secs(40)).await?;
//! assert_eq!(window.unhandled.count, 1);
//!
//! collector.stop().await
//! # }
//! ```

mod command;
mod handle;
mod worker;

pub(crate) use command::CollectorCommand;
pub use handle::CollectorHandle;
pub(crate) use worker::CollectorWorker;

use std::{fmt, num::NonZeroUsize, time::Duration};

use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    Category, CollectorConfig, CollectorStats, Error, Payload, Result, Snapshot, WindowSnapshot,
};

/// Owner of a running collector.
///
/// Dispatches to the worker through an internal [`CollectorHandle`]. Hand out
/// clones of [`handle()`](Self::handle) to producers and readers in other
/// tasks; keep the `Collector` itself to control the lifecycle.
///
/// [`stop()`](Self::stop) consumes the collector. Dropping it without calling
/// `stop()` aborts the worker task.
pub struct Collector<P: Payload> {
    handle: CollectorHandle<P>,
    worker_handle: Option<JoinHandle<()>>,
    capacity: NonZeroUsize,
}

impl<P: Payload> Collector<P> {
    /// Validate the configuration and start the collector's worker task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`] if the configured capacity is zero
    /// and [`Error::InvalidChannelCapacity`] if the command channel capacity
    /// is zero. No task is spawned in either case.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn new(config: CollectorConfig) -> Result<Self> {
        let capacity = NonZeroUsize::new(config.capacity())
            .ok_or(Error::InvalidCapacity(config.capacity()))?;
        if config.command_channel_capacity() == 0 {
            return Err(Error::InvalidChannelCapacity);
        }

        let (tx, rx) = mpsc::channel(config.command_channel_capacity());
        let mut worker = CollectorWorker::new(rx, capacity);
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Self {
            handle: CollectorHandle::new(tx),
            worker_handle: Some(worker_handle),
            capacity,
        })
    }

    /// Start a collector keeping `capacity` entries per category, with the
    /// default command channel capacity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`] if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::new(CollectorConfig::default().with_capacity(capacity))
    }

    /// Returns a cloneable handle for use from other tasks.
    pub fn handle(&self) -> CollectorHandle<P> {
        self.handle.clone()
    }

    /// Per-category buffer capacity.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// See [`CollectorHandle::record`].
    pub async fn record(&self, category: Category, value: P) -> Result {
        self.handle.record(category, value).await
    }

    /// See [`CollectorHandle::try_record`].
    pub fn try_record(&self, category: Category, value: P) -> Result {
        self.handle.try_record(category, value)
    }

    /// See [`CollectorHandle::snapshot`].
    pub async fn snapshot(&self) -> Result<Snapshot<P>> {
        self.handle.snapshot().await
    }

    /// See [`CollectorHandle::calculate_for_window`].
    pub async fn calculate_for_window(&self, window: Duration) -> Result<WindowSnapshot> {
        self.handle.calculate_for_window(window).await
    }

    /// See [`CollectorHandle::calculate_for_window_ms`].
    pub async fn calculate_for_window_ms(&self, window_ms: i64) -> Result<WindowSnapshot> {
        self.handle.calculate_for_window_ms(window_ms).await
    }

    /// See [`CollectorHandle::stats`].
    pub async fn stats(&self) -> Result<CollectorStats> {
        self.handle.stats().await
    }

    /// See [`CollectorHandle::clear`].
    pub async fn clear(&self) -> Result {
        self.handle.clear().await
    }

    /// Returns `true` until the worker has shut down.
    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    /// Stop accepting operations and wait for the worker to finish.
    ///
    /// Every command the worker accepted, including ones enqueued while the
    /// shutdown is in progress, is applied first. Afterwards all outstanding
    /// [`CollectorHandle`]s return [`Error::NotRunning`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotRunning`] if the worker was already gone or ended
    /// by panicking.
    pub async fn stop(mut self) -> Result {
        let sent = self.handle.sender.send(CollectorCommand::Shutdown).await;
        match (sent, self.worker_handle.take()) {
            (Ok(()), Some(handle)) => handle.await.map_err(|e| {
                tracing::error!(error = %e, "collector worker failed");
                Error::NotRunning
            }),
            (Err(_), Some(handle)) => {
                handle.abort();
                Err(Error::NotRunning)
            }
            (_, None) => Err(Error::NotRunning),
        }
    }
}

impl<P: Payload> Drop for Collector<P> {
    fn drop(&mut self) {
        if let Some(handle) = self.worker_handle.take() {
            handle.abort();
        }
    }
}

impl<P: Payload> fmt::Debug for Collector<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collector")
            .field("capacity", &self.capacity)
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}
