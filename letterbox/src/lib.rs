#![cfg_attr(docsrs, feature(doc_cfg))]
//! # Letterbox
//!
//! A bounded collector for the messages an actor runtime failed to deliver.
//!
//! Letterbox sits next to a Tokio-based actor runtime and keeps the most
//! recent dead letters, unhandled messages and dropped messages so operators
//! can inspect them, without unbounded memory growth and without ever blocking
//! on the runtime it observes.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use letterbox::{Category, Collector};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> letterbox::Result {
//!     let collector = Collector::with_capacity(100)?;
//!
//!     collector.record(Category::DeadLetter, "ping").await?;
//!     collector.record(Category::Unhandled, "pong").await?;
//!
//!     let snapshot = collector.snapshot().await?;
//!     assert_eq!(*snapshot.unhandled()[0].value(), "pong");
//!
//!     let window = collector.calculate_for_window(Duration::from_secs(60)).await?;
//!     assert_eq!(window.dead_letters.count, 1);
//!
//!     collector.stop().await
//! }
//! ```
//!
//! ## Core Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Category`] | `DeadLetter`, `Unhandled` or `Dropped` |
//! | [`Collector`] | Owns the worker task and its lifecycle |
//! | [`CollectorHandle`] | Cloneable front-end for recording and querying |
//! | [`Entry`] | A recorded payload plus its monotonic timestamp |
//! | [`Snapshot`] | Newest-first copy of every category |
//! | [`WindowSnapshot`] | Per-category counts over a trailing window |
//! | [`CollectorStats`] | Lifetime recorded/evicted counters |
//!
//! ## Bounded Buffers
//!
//! Each category keeps at most `capacity` entries. Recording into a full
//! category evicts its single oldest entry, so the retained entries are always
//! the most recent ones.
//!
//! ## Window Precision
//!
//! [`calculate_for_window`](CollectorHandle::calculate_for_window) reports for
//! each category a `count` and an `is_minimum_estimate` flag. Since eviction
//! only removes the oldest entry, a category whose oldest retained entry
//! predates the window start provably lost nothing inside the window, and its
//! count is exact. Otherwise the count is a lower bound:
//!
//! ```rust,ignore
//! let window = collector.calculate_for_window(Duration::from_millis(300)).await?;
//! if window.unhandled.is_minimum_estimate {
//!     println!("at least {} unhandled messages", window.unhandled.count);
//! } else {
//!     println!("exactly {} unhandled messages", window.unhandled.count);
//! }
//! ```
//!
//! ## Ingestion
//!
//! The [`ingest`] module connects a runtime's delivery-failure stream to a
//! collector. See [`ingest::Classify`] and [`ingest::Ingestion`].
//!
//! ## Features
//!
//! - **`serde`** - `Serialize`/`Deserialize` for configuration and query
//!   results, plus [`Snapshot::to_json()`]

mod buffer;
mod category;
mod collector;
mod config;
mod entry;
mod error;
mod snapshot;
mod stats;
mod window;

pub mod ingest;

pub use category::Category;
pub use collector::{Collector, CollectorHandle};
pub use config::CollectorConfig;
pub use entry::{Entry, Payload};
pub use error::Error;
pub use snapshot::Snapshot;
pub use stats::{CategoryStats, CollectorStats};
pub use window::{WindowResult, WindowSnapshot};

/// Convenience alias for `Result<T, letterbox::Error>`.
pub type Result<T = ()> = std::result::Result<T, Error>;
