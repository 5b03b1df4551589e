use std::{fmt, num::NonZeroUsize, sync::Arc, time::Duration};

use tokio::{sync::mpsc::Receiver, time::Instant};

use crate::{
    Category, CollectorStats, Entry, Snapshot, WindowSnapshot,
    buffer::CategoryBuffer,
    collector::CollectorCommand,
    window::estimate,
};

/// Sole owner of the three category buffers.
///
/// Drains the command queue one command at a time, so every query observes a
/// state that is a prefix of the `record` commands enqueued before it.
pub(crate) struct CollectorWorker<P> {
    receiver: Receiver<CollectorCommand<P>>,
    buffers: [CategoryBuffer<P>; 3],
    stats: CollectorStats,
    is_alive: bool,
}

impl<P> CollectorWorker<P> {
    pub fn new(receiver: Receiver<CollectorCommand<P>>, capacity: NonZeroUsize) -> Self {
        Self {
            receiver,
            buffers: [
                CategoryBuffer::new(capacity),
                CategoryBuffer::new(capacity),
                CategoryBuffer::new(capacity),
            ],
            stats: CollectorStats::default(),
            is_alive: true,
        }
    }

    pub async fn run(&mut self) {
        tracing::info!(capacity = self.buffers[0].capacity(), "collector started");

        // After `Shutdown` closes the receiver, `recv` still yields every
        // command that was already accepted before returning `None`.
        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        tracing::info!(recorded = self.stats.total_recorded(), "collector stopped");
    }

    pub(crate) fn handle_command(&mut self, cmd: CollectorCommand<P>) {
        use CollectorCommand::*;
        match cmd {
            Record(category, value) => {
                self.record(category, value);
            }
            GetSnapshot(resp) => {
                // A dropped receiver means the caller gave up waiting.
                let _ = resp.send(self.snapshot());
            }
            CalculateForWindow(window, resp) => {
                let _ = resp.send(self.calculate_for_window(window));
            }
            GetStats(resp) => {
                let _ = resp.send(self.stats());
            }
            Clear => {
                self.clear();
            }
            Shutdown => {
                if self.is_alive {
                    self.is_alive = false;
                    self.receiver.close();
                    tracing::debug!("collector closing, draining queued commands");
                }
            }
        }
    }

    fn buffer(&self, category: Category) -> &CategoryBuffer<P> {
        &self.buffers[category.index()]
    }

    fn record(&mut self, category: Category, value: P) {
        let entry = Arc::new(Entry::new(value));
        let evicted = self.buffers[category.index()].insert(entry).is_some();

        let stats = self.stats.get_mut(category);
        stats.recorded += 1;
        if evicted {
            stats.evicted += 1;
        }

        tracing::trace!(category = %category, evicted, "entry recorded");
    }

    fn snapshot(&self) -> Snapshot<P> {
        tracing::debug!("snapshot requested");
        Snapshot {
            dead_letters: self.buffer(Category::DeadLetter).snapshot_newest_first(),
            unhandled: self.buffer(Category::Unhandled).snapshot_newest_first(),
            dropped: self.buffer(Category::Dropped).snapshot_newest_first(),
            taken_at: Instant::now(),
        }
    }

    fn calculate_for_window(&self, window: Duration) -> WindowSnapshot {
        let now = Instant::now();
        let result = WindowSnapshot {
            dead_letters: estimate(self.buffer(Category::DeadLetter), window, now),
            unhandled: estimate(self.buffer(Category::Unhandled), window, now),
            dropped: estimate(self.buffer(Category::Dropped), window, now),
        };
        tracing::debug!(
            window_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX),
            total = result.total(),
            "window calculated"
        );
        result
    }

    fn stats(&self) -> CollectorStats {
        let mut stats = self.stats;
        for category in Category::ALL {
            stats.get_mut(category).retained = self.buffer(category).len();
        }
        stats
    }

    fn clear(&mut self) {
        for buffer in &mut self.buffers {
            buffer.clear();
        }
        tracing::debug!("buffers cleared");
    }
}

impl<P> fmt::Debug for CollectorWorker<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectorWorker")
            .field("receiver", &self.receiver)
            .field("dead_letters.len()", &self.buffers[0].len())
            .field("unhandled.len()", &self.buffers[1].len())
            .field("dropped.len()", &self.buffers[2].len())
            .field("stats", &self.stats)
            .field("is_alive", &self.is_alive)
            .finish()
    }
}
