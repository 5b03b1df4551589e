use std::fmt;

use futures_util::{Stream, StreamExt};
use tokio::{select, sync::mpsc::Receiver, task::JoinHandle};
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

use crate::{
    CollectorHandle,
    ingest::{Classified, Classify},
};

/// Counters reported when an ingestion task finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestionReport {
    /// Raw events forwarded to the collector.
    pub forwarded: u64,
    /// Raw events that could not be classified and were discarded.
    pub discarded: u64,
}

/// A running subscription that forwards classified runtime events into a
/// collector.
///
/// The task ends when the source stream ends, when the collector stops, or
/// when [`unsubscribe()`](Self::unsubscribe) is called. Dropping an
/// `Ingestion` cancels it as well.
///
/// # Example
///
/// ```rust
/// use letterbox::{Collector, ingest::{DeliveryFailure, FailureReason, Ingestion}};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> letterbox::Result {
/// let collector = Collector::with_capacity(64)?;
/// let (tx, rx) = tokio::sync::mpsc::channel::<DeliveryFailure<&str>>(16);
/// let ingestion = Ingestion::from_receiver(rx, collector.handle());
///
/// tx.send(DeliveryFailure::new("ping", FailureReason::RecipientTerminated))
///     .await
///     .unwrap();
///
/// drop(tx);
/// while !ingestion.is_finished() {
///     tokio::task::yield_now().await;
/// }
/// let report = ingestion.unsubscribe().await;
/// assert_eq!(report.forwarded, 1);
/// # collector.stop().await
/// # }
/// ```
pub struct Ingestion {
    cancel_token: CancellationToken,
    task: Option<JoinHandle<IngestionReport>>,
}

impl Ingestion {
    /// Spawn a task draining `source` into `collector`.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn spawn<R, S>(source: S, collector: CollectorHandle<R::Payload>) -> Self
    where
        R: Classify,
        S: Stream<Item = R> + Send + Unpin + 'static,
    {
        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();
        let task = tokio::spawn(async move { forward(source, collector, token).await });
        Self {
            cancel_token,
            task: Some(task),
        }
    }

    /// Subscribe through a Tokio channel the host runtime publishes into.
    pub fn from_receiver<R>(receiver: Receiver<R>, collector: CollectorHandle<R::Payload>) -> Self
    where
        R: Classify,
    {
        Self::spawn(ReceiverStream::new(receiver), collector)
    }

    /// Returns `true` once the forwarding task has ended.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|t| t.is_finished())
    }

    /// Stop forwarding and wait for the task to end.
    ///
    /// An event already pulled from the source is forwarded before the task
    /// exits. The source itself is dropped, so anything still queued in it is
    /// lost.
    pub async fn unsubscribe(mut self) -> IngestionReport {
        self.cancel_token.cancel();
        let report = match self.task.take() {
            Some(task) => task.await.unwrap_or_else(|e| {
                tracing::error!(error = %e, "ingestion task failed");
                IngestionReport::default()
            }),
            None => IngestionReport::default(),
        };
        tracing::info!(
            forwarded = report.forwarded,
            discarded = report.discarded,
            "ingestion unsubscribed"
        );
        report
    }
}

impl Drop for Ingestion {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

impl fmt::Debug for Ingestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ingestion")
            .field("cancelled", &self.cancel_token.is_cancelled())
            .field("finished", &self.is_finished())
            .finish()
    }
}

async fn forward<R, S>(
    mut source: S,
    collector: CollectorHandle<R::Payload>,
    cancel_token: CancellationToken,
) -> IngestionReport
where
    R: Classify,
    S: Stream<Item = R> + Unpin,
{
    let mut report = IngestionReport::default();
    loop {
        let raw = select! {
            biased;
            _ = cancel_token.cancelled() => break,
            next = source.next() => match next {
                Some(raw) => raw,
                None => break,
            },
        };

        match raw.classify() {
            Classified::Record(category, payload) => {
                if let Err(e) = collector.record(category, payload).await {
                    tracing::info!(error = %e, "collector unavailable, ending ingestion");
                    break;
                }
                report.forwarded += 1;
            }
            Classified::Unclassifiable { reason } => {
                report.discarded += 1;
                tracing::warn!(reason = %reason, "discarding unclassifiable delivery failure");
            }
        }
    }
    report
}
