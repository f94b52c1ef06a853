// Insertion-ordered occurrence counter
use ahash::AHashMap;

/// Counts string keys while remembering the order each key was first seen.
///
/// Iteration, ranking ties and artifact output all follow first-seen
/// order, which keeps every run over the same input byte-identical.
#[derive(Debug, Clone, Default)]
pub struct OrderedCounter {
    index: AHashMap<String, usize>,
    entries: Vec<(String, u32)>,
}

impl OrderedCounter {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment `key` by one, returning the new count
    pub fn add(&mut self, key: &str) -> u32 {
        self.add_n(key, 1)
    }

    pub fn add_n(&mut self, key: &str, n: u32) -> u32 {
        match self.index.get(key) {
            Some(&i) => {
                self.entries[i].1 += n;
                self.entries[i].1
            }
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), n));
                n
            }
        }
    }

    #[inline]
    pub fn get(&self, key: &str) -> u32 {
        self.index.get(key).map(|&i| self.entries[i].1).unwrap_or(0)
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| u64::from(*c)).sum()
    }

    /// Entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), *c))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries by descending count; ties keep first-seen order
    pub fn most_common(&self) -> Vec<(&str, u32)> {
        let mut ranked: Vec<(&str, u32)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_order() {
        let mut counter = OrderedCounter::new();
        for word in ["b", "a", "b", "c", "a", "b"] {
            counter.add(word);
        }

        assert_eq!(counter.get("b"), 3);
        assert_eq!(counter.get("missing"), 0);
        assert_eq!(counter.total(), 6);
        assert_eq!(counter.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_most_common_ties_keep_first_seen() {
        let mut counter = OrderedCounter::new();
        counter.add("x");
        counter.add("y");
        counter.add_n("z", 2);

        let ranked = counter.most_common();
        assert_eq!(ranked, vec![("z", 2), ("x", 1), ("y", 1)]);
    }
}
