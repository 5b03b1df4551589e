use std::time::Duration;

use tokio::sync::oneshot;

use crate::{Category, CollectorStats, Snapshot, WindowSnapshot};

pub(crate) enum CollectorCommand<P> {
    /// The worker stamps the entry when it applies the command, so buffer
    /// order and timestamp order always agree.
    Record(Category, P),
    GetSnapshot(oneshot::Sender<Snapshot<P>>),
    CalculateForWindow(Duration, oneshot::Sender<WindowSnapshot>),
    GetStats(oneshot::Sender<CollectorStats>),
    Clear,
    Shutdown,
}
