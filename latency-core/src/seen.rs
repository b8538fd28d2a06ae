//! Append-only memory of reported marker events.

use latency_types::SeenKey;
use std::collections::HashSet;

/// Set of [`SeenKey`]s already reported.
///
/// Entries are never evicted, so memory grows with the number of distinct
/// events for the life of the process. A bounded variant would key an LRU by
/// file name and drop names missing from the latest listing.
#[derive(Debug, Clone, Default)]
pub struct SeenSet {
    keys: HashSet<SeenKey>,
}

impl SeenSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` was already recorded.
    pub fn contains(&self, key: &SeenKey) -> bool {
        self.keys.contains(key)
    }

    /// Record `key`. Returns `true` if it was not present before.
    pub fn add(&mut self, key: SeenKey) -> bool {
        self.keys.insert(key)
    }

    /// Number of recorded keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let seen = SeenSet::new();
        assert!(seen.is_empty());
        assert_eq!(seen.len(), 0);
    }

    #[test]
    fn add_then_contains() {
        let mut seen = SeenSet::new();
        let key = SeenKey::new("a.fst", "t1");

        assert!(!seen.contains(&key));
        assert!(seen.add(key.clone()));
        assert!(seen.contains(&key));
    }

    #[test]
    fn duplicate_add_is_not_new() {
        let mut seen = SeenSet::new();
        assert!(seen.add(SeenKey::new("a.fst", "t1")));
        assert!(!seen.add(SeenKey::new("a.fst", "t1")));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn size_never_shrinks() {
        let mut seen = SeenSet::new();
        let mut last = 0;
        for round in 0..5 {
            for name in ["a.fst", "b.fst"] {
                seen.add(SeenKey::new(name, &format!("t{}", round / 2)));
                assert!(seen.len() >= last);
                last = seen.len();
            }
        }
        assert_eq!(seen.len(), 6);
    }
}
