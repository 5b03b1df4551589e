use std::{fmt, time::Duration};

use tokio::sync::{mpsc::Sender, oneshot};

use crate::{
    Category, CollectorStats, Payload, Result, Snapshot, WindowSnapshot,
    collector::CollectorCommand,
};

/// Cloneable front-end to a running [`Collector`](crate::Collector).
///
/// Every method enqueues a command for the collector's worker. Handles are
/// cheap to clone and can be moved into any task.
///
/// Once the collector has stopped, every method returns
/// [`Error::NotRunning`](crate::Error::NotRunning).
pub struct CollectorHandle<P: Payload> {
    pub(crate) sender: Sender<CollectorCommand<P>>,
}

impl<P: Payload> CollectorHandle<P> {
    pub(crate) fn new(sender: Sender<CollectorCommand<P>>) -> Self {
        Self { sender }
    }

    /// Record `value` under `category`, stamped with the instant the
    /// collector applies it.
    ///
    /// Waits only for space in the command queue, never for the record to be
    /// applied. Records are applied in the order they are enqueued.
    pub async fn record(&self, category: Category, value: P) -> Result {
        self.sender
            .send(CollectorCommand::Record(category, value))
            .await?;
        Ok(())
    }

    /// Non-waiting variant of [`record`](Self::record) for synchronous
    /// callers such as runtime hooks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QueueFull`](crate::Error::QueueFull) if the command
    /// queue has no space; the value is not recorded in that case.
    pub fn try_record(&self, category: Category, value: P) -> Result {
        self.sender
            .try_send(CollectorCommand::Record(category, value))?;
        Ok(())
    }

    /// Copy of every category buffer, each ordered newest first.
    pub async fn snapshot(&self) -> Result<Snapshot<P>> {
        let (tx, rx) = oneshot::channel();
        self.sender.send(CollectorCommand::GetSnapshot(tx)).await?;
        Ok(rx.await?)
    }

    /// Count the entries of each category recorded within the trailing
    /// `window`, with a flag telling whether each count is exact.
    ///
    /// All three categories are evaluated against the same "now". A zero
    /// window yields a zero count flagged as a minimum estimate.
    pub async fn calculate_for_window(&self, window: Duration) -> Result<WindowSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(CollectorCommand::CalculateForWindow(window, tx))
            .await?;
        Ok(rx.await?)
    }

    /// Millisecond form of [`calculate_for_window`](Self::calculate_for_window).
    ///
    /// Non-positive durations carry no evidence and report a zero count
    /// flagged as a minimum estimate for every category.
    pub async fn calculate_for_window_ms(&self, window_ms: i64) -> Result<WindowSnapshot> {
        let window = u64::try_from(window_ms)
            .map(Duration::from_millis)
            .unwrap_or(Duration::ZERO);
        self.calculate_for_window(window).await
    }

    /// Lifetime counters per category.
    pub async fn stats(&self) -> Result<CollectorStats> {
        let (tx, rx) = oneshot::channel();
        self.sender.send(CollectorCommand::GetStats(tx)).await?;
        Ok(rx.await?)
    }

    /// Drop every retained entry. Lifetime counters are kept.
    pub async fn clear(&self) -> Result {
        self.sender.send(CollectorCommand::Clear).await?;
        Ok(())
    }

    /// Returns `true` until the collector's worker has shut down.
    pub fn is_running(&self) -> bool {
        !self.sender.is_closed()
    }
}

impl<P: Payload> Clone for CollectorHandle<P> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<P: Payload> fmt::Debug for CollectorHandle<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectorHandle")
            .field("is_running", &self.is_running())
            .finish()
    }
}
