use crate::Category;

/// Lifetime counters for one category.
///
/// `retained` is always `recorded - evicted`, minus whatever a
/// [`clear`](crate::CollectorHandle::clear) discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryStats {
    /// Entries currently held in the buffer.
    pub retained: usize,
    /// Entries ever recorded.
    pub recorded: u64,
    /// Entries pushed out by newer ones.
    pub evicted: u64,
}

/// Counters for every category, taken atomically with respect to `record`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CollectorStats {
    pub dead_letters: CategoryStats,
    pub unhandled: CategoryStats,
    pub dropped: CategoryStats,
}

impl CollectorStats {
    pub fn get(&self, category: Category) -> &CategoryStats {
        match category {
            Category::DeadLetter => &self.dead_letters,
            Category::Unhandled => &self.unhandled,
            Category::Dropped => &self.dropped,
        }
    }

    pub(crate) fn get_mut(&mut self, category: Category) -> &mut CategoryStats {
        match category {
            Category::DeadLetter => &mut self.dead_letters,
            Category::Unhandled => &mut self.unhandled,
            Category::Dropped => &mut self.dropped,
        }
    }

    /// Entries ever recorded over all categories.
    pub fn total_recorded(&self) -> u64 {
        Category::ALL.iter().map(|c| self.get(*c).recorded).sum()
    }
}
