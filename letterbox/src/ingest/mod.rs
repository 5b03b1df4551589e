//! Boundary between a host actor runtime and the collector.
//!
//! The runtime publishes delivery-failure notifications; this module
//! classifies each one into exactly one [`Category`](crate::Category) and
//! records it. Events that cannot be classified are logged and discarded here,
//! so the collector never sees them.
//!
//! - [`Classify`] is the runtime-specific mapping. Implement it for your
//!   runtime's notification type, or use the stock [`DeliveryFailure`].
//! - [`Ingestion`] is the subscription: a task that drains a stream of raw
//!   events into a [`CollectorHandle`](crate::CollectorHandle) until
//!   [`Ingestion::unsubscribe`] is called.

mod actor_id;
mod classify;
mod failure;
mod ingestion;

pub use actor_id::ActorId;
pub use classify::{Classified, Classify};
pub use failure::{DeliveryFailure, FailureReason, Undelivered};
pub use ingestion::{Ingestion, IngestionReport};
