use std::{fmt, sync::Arc};

use tokio::time::Instant;

use crate::{Category, Entry};

/// Point-in-time copy of every category buffer, newest entry first.
///
/// A snapshot shares entries with the collector through `Arc` but is otherwise
/// independent of it: later `record` calls never show up in a snapshot that
/// was already taken.
pub struct Snapshot<P> {
    pub(crate) dead_letters: Vec<Arc<Entry<P>>>,
    pub(crate) unhandled: Vec<Arc<Entry<P>>>,
    pub(crate) dropped: Vec<Arc<Entry<P>>>,
    pub(crate) taken_at: Instant,
}

impl<P> Snapshot<P> {
    /// Dead letters, most recent first.
    pub fn dead_letters(&self) -> &[Arc<Entry<P>>] {
        &self.dead_letters
    }

    /// Unhandled messages, most recent first.
    pub fn unhandled(&self) -> &[Arc<Entry<P>>] {
        &self.unhandled
    }

    /// Dropped messages, most recent first.
    pub fn dropped(&self) -> &[Arc<Entry<P>>] {
        &self.dropped
    }

    /// Entries of one category, most recent first.
    pub fn get(&self, category: Category) -> &[Arc<Entry<P>>] {
        match category {
            Category::DeadLetter => &self.dead_letters,
            Category::Unhandled => &self.unhandled,
            Category::Dropped => &self.dropped,
        }
    }

    /// The instant the collector produced this snapshot.
    pub fn taken_at(&self) -> Instant {
        self.taken_at
    }

    /// Returns `true` if no category holds any entry.
    pub fn is_empty(&self) -> bool {
        self.dead_letters.is_empty() && self.unhandled.is_empty() && self.dropped.is_empty()
    }

    /// Total number of entries over all categories.
    pub fn len(&self) -> usize {
        self.dead_letters.len() + self.unhandled.len() + self.dropped.len()
    }
}

impl<P> Clone for Snapshot<P> {
    fn clone(&self) -> Self {
        Self {
            dead_letters: self.dead_letters.clone(),
            unhandled: self.unhandled.clone(),
            dropped: self.dropped.clone(),
            taken_at: self.taken_at,
        }
    }
}

impl<P> fmt::Debug for Snapshot<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("dead_letters.len()", &self.dead_letters.len())
            .field("unhandled.len()", &self.unhandled.len())
            .field("dropped.len()", &self.dropped.len())
            .field("taken_at", &self.taken_at)
            .finish()
    }
}

#[cfg(feature = "serde")]
impl<P: serde::Serialize> Snapshot<P> {
    /// Render the snapshot as pretty-printed JSON for an operator surface.
    ///
    /// Each category becomes a list of `{ "ageMs": u64, "value": P }` objects,
    /// newest first. Ages are measured from [`taken_at`](Self::taken_at), so
    /// rendering the same snapshot twice yields identical output.
    ///
    /// # Errors
    ///
    /// Returns any serialization error produced by `serde_json`.
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    pub fn to_json(&self) -> serde_json::Result<String> {
        use serde::Serialize;

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct EntryExport<'a, P> {
            age_ms: u64,
            value: &'a P,
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct SnapshotExport<'a, P> {
            dead_letters: Vec<EntryExport<'a, P>>,
            unhandled: Vec<EntryExport<'a, P>>,
            dropped: Vec<EntryExport<'a, P>>,
        }

        fn export<P>(entries: &[Arc<Entry<P>>], taken_at: Instant) -> Vec<EntryExport<'_, P>> {
            entries
                .iter()
                .map(|e| EntryExport {
                    age_ms: u64::try_from(taken_at.saturating_duration_since(e.timestamp()).as_millis())
                        .unwrap_or(u64::MAX),
                    value: e.value(),
                })
                .collect()
        }

        serde_json::to_string_pretty(&SnapshotExport {
            dead_letters: export(&self.dead_letters, self.taken_at),
            unhandled: export(&self.unhandled, self.taken_at),
            dropped: export(&self.dropped, self.taken_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot<&'static str> {
        Snapshot {
            dead_letters: vec![Arc::new(Entry::new("gone"))],
            unhandled: vec![Arc::new(Entry::new("b")), Arc::new(Entry::new("a"))],
            dropped: Vec::new(),
            taken_at: Instant::now(),
        }
    }

    #[test]
    fn accessors_match_categories() {
        let snap = snapshot();
        assert_eq!(snap.get(Category::DeadLetter).len(), 1);
        assert_eq!(*snap.get(Category::Unhandled)[0].value(), "b");
        assert!(snap.get(Category::Dropped).is_empty());
        assert_eq!(snap.len(), 3);
        assert!(!snap.is_empty());
    }

    #[test]
    fn clone_shares_entries() {
        let snap = snapshot();
        let copy = snap.clone();
        assert!(Arc::ptr_eq(&snap.unhandled()[0], &copy.unhandled()[0]));
    }

    #[test]
    fn debug_reports_lengths() {
        let debug_str = format!("{:?}", snapshot());
        assert!(debug_str.contains("unhandled.len()"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn to_json_lists_entries_newest_first() {
        use serde_json::Value;

        let json = snapshot().to_json().unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();

        let unhandled = parsed["unhandled"].as_array().unwrap();
        assert_eq!(unhandled.len(), 2);
        assert_eq!(unhandled[0]["value"], "b");
        assert_eq!(unhandled[1]["value"], "a");
        assert!(unhandled[0]["ageMs"].is_u64());
        assert!(parsed["dropped"].as_array().unwrap().is_empty());
    }
}
