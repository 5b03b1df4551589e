use std::time::Duration;

use tokio::time::Instant;

use crate::{Category, buffer::CategoryBuffer};

/// Count of entries inside a trailing time window for one category.
///
/// `count` is always the exact number of *retained* entries recorded at or
/// after the window start. `is_minimum_estimate` tells whether that number
/// may understate reality:
///
/// - `false`: the oldest retained entry predates the window start. Eviction
///   only ever removes the globally oldest entry, so nothing inside the window
///   can have been evicted and `count` is exact.
/// - `true`: the buffer is empty, or its oldest entry is younger than the
///   window start. Matching entries may have been evicted, so `count` is a
///   lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WindowResult {
    pub count: usize,
    pub is_minimum_estimate: bool,
}

impl WindowResult {
    /// A zero count with no evidence of completeness.
    pub const NO_EVIDENCE: WindowResult = WindowResult {
        count: 0,
        is_minimum_estimate: true,
    };

    /// Returns `true` if `count` is proven to be the true in-window total.
    pub fn is_exact(&self) -> bool {
        !self.is_minimum_estimate
    }
}

/// Window results for all three categories, computed against one shared "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WindowSnapshot {
    pub dead_letters: WindowResult,
    pub unhandled: WindowResult,
    pub dropped: WindowResult,
}

impl WindowSnapshot {
    /// Returns the result for a single category.
    pub fn get(&self, category: Category) -> &WindowResult {
        match category {
            Category::DeadLetter => &self.dead_letters,
            Category::Unhandled => &self.unhandled,
            Category::Dropped => &self.dropped,
        }
    }

    /// Sum of counts over all categories.
    pub fn total(&self) -> usize {
        self.dead_letters.count + self.unhandled.count + self.dropped.count
    }
}

/// Computes the in-window count and precision flag for one buffer.
///
/// `now` must be shared by every category of a single query so the window
/// boundaries line up.
pub(crate) fn estimate<P>(
    buffer: &CategoryBuffer<P>,
    window: Duration,
    now: Instant,
) -> WindowResult {
    if window.is_zero() {
        return WindowResult::NO_EVIDENCE;
    }

    // A window reaching past the clock origin covers everything retained, but
    // nothing older than the origin could ever prove completeness.
    let Some(threshold) = now.checked_sub(window) else {
        return WindowResult {
            count: buffer.len(),
            is_minimum_estimate: true,
        };
    };

    let count = buffer.count_since(threshold);
    let is_minimum_estimate = match buffer.oldest_timestamp() {
        None => true,
        Some(oldest) => oldest > threshold,
    };

    WindowResult {
        count,
        is_minimum_estimate,
    }
}
