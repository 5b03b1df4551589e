use std::fmt;

use tokio::time::Instant;

use crate::{
    Category,
    ingest::{ActorId, Classified, Classify},
};

/// Why the host runtime failed to deliver a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// The recipient had already terminated.
    RecipientTerminated,
    /// No actor is registered under the recipient's name.
    RecipientNotFound,
    /// The recipient's mailbox was closed before delivery.
    MailboxClosed,
    /// The recipient received the message but had no handler for it.
    NoMatchingHandler,
    /// The recipient's mailbox was full.
    MailboxFull,
    /// The runtime shed the message under an overflow policy.
    Overflow,
    /// A reason this crate does not know how to classify.
    Unknown(String),
}

impl FailureReason {
    /// Total mapping onto the collector's categories; `None` for
    /// [`Unknown`](Self::Unknown).
    pub fn category(&self) -> Option<Category> {
        match self {
            FailureReason::RecipientTerminated
            | FailureReason::RecipientNotFound
            | FailureReason::MailboxClosed => Some(Category::DeadLetter),
            FailureReason::NoMatchingHandler => Some(Category::Unhandled),
            FailureReason::MailboxFull | FailureReason::Overflow => Some(Category::Dropped),
            FailureReason::Unknown(_) => None,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::RecipientTerminated => write!(f, "recipient terminated"),
            FailureReason::RecipientNotFound => write!(f, "recipient not found"),
            FailureReason::MailboxClosed => write!(f, "mailbox closed"),
            FailureReason::NoMatchingHandler => write!(f, "no matching handler"),
            FailureReason::MailboxFull => write!(f, "mailbox full"),
            FailureReason::Overflow => write!(f, "overflow"),
            FailureReason::Unknown(reason) => write!(f, "unknown ({reason})"),
        }
    }
}

/// A delivery-failure notification as published by the host runtime.
#[derive(Debug, Clone)]
pub struct DeliveryFailure<M> {
    pub message: M,
    pub reason: FailureReason,
    pub sender: Option<ActorId>,
    pub recipient: Option<ActorId>,
    pub occurred_at: Instant,
}

impl<M> DeliveryFailure<M> {
    /// A failure that occurred now, without sender or recipient metadata.
    pub fn new(message: M, reason: FailureReason) -> Self {
        Self {
            message,
            reason,
            sender: None,
            recipient: None,
            occurred_at: Instant::now(),
        }
    }

    pub fn with_sender(mut self, sender: impl Into<ActorId>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn with_recipient(mut self, recipient: impl Into<ActorId>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    pub fn with_occurred_at(mut self, occurred_at: Instant) -> Self {
        self.occurred_at = occurred_at;
        self
    }
}

/// What the collector retains for a classified [`DeliveryFailure`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Undelivered<M> {
    pub message: M,
    pub sender: Option<ActorId>,
    pub recipient: Option<ActorId>,
    /// When the runtime observed the failure. The entry's own timestamp is
    /// when the collector recorded it.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub occurred_at: Instant,
}

impl<M: Send + Sync + 'static> Classify for DeliveryFailure<M> {
    type Payload = Undelivered<M>;

    fn classify(self) -> Classified<Undelivered<M>> {
        let Some(category) = self.reason.category() else {
            return Classified::Unclassifiable {
                reason: self.reason.to_string(),
            };
        };
        Classified::Record(
            category,
            Undelivered {
                message: self.message,
                sender: self.sender,
                recipient: self.recipient,
                occurred_at: self.occurred_at,
            },
        )
    }
}
