use std::{borrow::Borrow, fmt, sync::Arc};

/// Name of an actor in the host runtime.
///
/// Carried as sender and recipient metadata on
/// [`Undelivered`](crate::ingest::Undelivered) payloads, which are retained
/// for as long as they stay in a buffer. Backed by `Arc<str>` so cloning into
/// many entries does not copy the name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ActorId(Arc<str>);

impl ActorId {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ActorId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActorId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ActorId {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn equal_across_allocations() {
        let a = ActorId::new("worker-1");
        let b = ActorId::from(String::from("worker-1"));
        assert_eq!(a, b);
        assert_ne!(a, ActorId::from("worker-2"));
    }

    #[test]
    fn lookup_by_str() {
        let ids: HashSet<ActorId> = ["a", "b"].into_iter().map(ActorId::from).collect();
        assert!(ids.contains("a"));
        assert!(!ids.contains("c"));
    }

    #[test]
    fn display_is_the_name() {
        assert_eq!(ActorId::new("pinger").to_string(), "pinger");
    }
}
