use tokio::sync::{
    mpsc::error::{SendError, TrySendError},
    oneshot::error::RecvError,
};

/// The single error type for all collector operations.
///
/// Every fallible API returns `letterbox::Result<T>` (alias for
/// `Result<T, letterbox::Error>`). Channel errors from the worker plumbing are
/// mapped into [`NotRunning`](Self::NotRunning) so callers only need to handle
/// one error type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Invalid buffer capacity {0}: must be at least 1")]
    InvalidCapacity(usize),

    #[error("Invalid command channel capacity: must be at least 1")]
    InvalidChannelCapacity,

    #[error("Collector is not running")]
    NotRunning,

    #[error("Collector command queue is full")]
    QueueFull,
}

impl<T> From<SendError<T>> for Error {
    fn from(_e: SendError<T>) -> Self {
        Error::NotRunning
    }
}

impl<T> From<TrySendError<T>> for Error {
    fn from(e: TrySendError<T>) -> Self {
        match e {
            TrySendError::Full(_) => Error::QueueFull,
            TrySendError::Closed(_) => Error::NotRunning,
        }
    }
}

impl From<RecvError> for Error {
    fn from(_e: RecvError) -> Self {
        Error::NotRunning
    }
}
