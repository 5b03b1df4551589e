use crate::{Category, Payload};

/// Outcome of classifying a raw runtime event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified<P> {
    /// The event belongs to `category` and should be recorded as `payload`.
    Record(Category, P),
    /// The event could not be mapped to any category.
    Unclassifiable { reason: String },
}

/// Maps raw host-runtime events onto [`Category`].
///
/// This is the replaceable boundary between a particular actor runtime and
/// the collector: implement it for whatever the runtime publishes on its
/// delivery-failure stream. The mapping must be total, in that every event
/// yields either a category or an explicit [`Classified::Unclassifiable`].
///
/// # Example
///
/// ```rust
/// use letterbox::Category;
/// use letterbox::ingest::{Classified, Classify};
///
/// enum RuntimeNotice {
///     Terminated(String),
///     Overloaded(String),
///     Garbled,
/// }
///
/// impl Classify for RuntimeNotice {
///     type Payload = String;
///
///     fn classify(self) -> Classified<String> {
///         match self {
///             RuntimeNotice::Terminated(msg) => Classified::Record(Category::DeadLetter, msg),
///             RuntimeNotice::Overloaded(msg) => Classified::Record(Category::Dropped, msg),
///             RuntimeNotice::Garbled => Classified::Unclassifiable {
///                 reason: "garbled notice".into(),
///             },
///         }
///     }
/// }
/// ```
pub trait Classify: Send + 'static {
    /// What the collector retains for a classified event.
    type Payload: Payload;

    fn classify(self) -> Classified<Self::Payload>;
}
