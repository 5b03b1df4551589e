use std::fmt;

/// The kind of delivery failure an [`Entry`](crate::Entry) was recorded under.
///
/// The set is closed: every raw runtime event either maps to exactly one
/// category or is discarded by the ingestion layer before reaching the
/// collector.
///
/// | Category | Meaning |
/// |----------|---------|
/// | [`DeadLetter`](Self::DeadLetter) | Recipient no longer exists |
/// | [`Unhandled`](Self::Unhandled) | Recipient is alive but had no matching handler |
/// | [`Dropped`](Self::Dropped) | Recipient's mailbox was full |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    /// The message could not be delivered because its recipient is gone.
    DeadLetter,

    /// The message reached a live recipient that did not handle it.
    Unhandled,

    /// The message was discarded because the recipient was overloaded.
    Dropped,
}

impl Category {
    /// All categories, in report order.
    pub const ALL: [Category; 3] = [Category::DeadLetter, Category::Unhandled, Category::Dropped];

    /// Returns `true` if this is [`DeadLetter`](Self::DeadLetter).
    pub fn is_dead_letter(&self) -> bool {
        matches!(self, Category::DeadLetter)
    }

    /// Returns `true` if this is [`Unhandled`](Self::Unhandled).
    pub fn is_unhandled(&self) -> bool {
        matches!(self, Category::Unhandled)
    }

    /// Returns `true` if this is [`Dropped`](Self::Dropped).
    pub fn is_dropped(&self) -> bool {
        matches!(self, Category::Dropped)
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Category::DeadLetter => 0,
            Category::Unhandled => 1,
            Category::Dropped => 2,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::DeadLetter => write!(f, "DeadLetter"),
            Category::Unhandled => write!(f, "Unhandled"),
            Category::Dropped => write!(f, "Dropped"),
        }
    }
}
