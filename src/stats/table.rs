//! Word frequency table
//!
//! A `FrequencyTable` maps normalized words to occurrence counts. It is the
//! unit of work passed between every stage of the pipeline: counter threads
//! fill private tables, participants merge them, and the coordinator folds
//! every participant's table into the global one.
//!
//! Entries always carry a count of at least 1. Iteration is sorted by word,
//! which keeps output and tests deterministic.

use crate::error::{PipelineError, PipelineResult};
use std::collections::btree_map::{self, BTreeMap};

/// Mapping from word to occurrence count
///
/// The running total is kept alongside the entries, so no count and no sum
/// of counts can exceed `u64::MAX`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<String, u64>,
    total: u64,
}

impl FrequencyTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
            total: 0,
        }
    }

    /// Record one occurrence of `word`
    ///
    /// Every recorded occurrence is a token held in memory, so this cannot
    /// overflow.
    #[inline]
    pub fn record(&mut self, word: &str) {
        match self.counts.get_mut(word) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(word.to_string(), 1);
            }
        }
        self.total += 1;
    }

    /// Add `count` occurrences of `word`
    ///
    /// Adding zero is a no-op so the table never holds zero-count entries.
    /// The table is unchanged when the addition would overflow.
    pub fn add(&mut self, word: impl Into<String>, count: u64) -> PipelineResult<()> {
        if count == 0 {
            return Ok(());
        }

        let word = word.into();
        let total = self.total.checked_add(count);
        let entry = self.get(&word).checked_add(count);

        match (entry, total) {
            (Some(entry), Some(total)) => {
                self.counts.insert(word, entry);
                self.total = total;
                Ok(())
            }
            _ => Err(PipelineError::CountOverflow { word }),
        }
    }

    /// Count for `word` (0 if absent)
    pub fn get(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Merge another table into this one (`self[w] += other[w]`)
    ///
    /// All-or-nothing: every sum is checked before the first entry changes.
    pub fn try_merge(&mut self, other: FrequencyTable) -> PipelineResult<()> {
        if self.counts.is_empty() {
            *self = other;
            return Ok(());
        }

        let total = self.total.checked_add(other.total);
        let overflowing = other
            .counts
            .iter()
            .find(|&(word, &count)| self.get(word).checked_add(count).is_none())
            .map(|(word, _)| word.clone());

        match (total, overflowing) {
            (Some(total), None) => {
                for (word, count) in other.counts {
                    *self.counts.entry(word).or_insert(0) += count;
                }
                self.total = total;
                Ok(())
            }
            (_, Some(word)) => Err(PipelineError::CountOverflow { word }),
            (None, None) => Err(PipelineError::CountOverflow {
                word: "<total>".to_string(),
            }),
        }
    }

    /// Iterate entries in word order
    pub fn iter(&self) -> btree_map::Iter<'_, String, u64> {
        self.counts.iter()
    }

    /// Entries ordered by descending count, ties broken by word
    pub fn sorted_by_count(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self
            .counts
            .iter()
            .map(|(word, &count)| (word.as_str(), count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

impl<'a> IntoIterator for &'a FrequencyTable {
    type Item = (&'a String, &'a u64);
    type IntoIter = btree_map::Iter<'a, String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}

impl IntoIterator for FrequencyTable {
    type Item = (String, u64);
    type IntoIter = btree_map::IntoIter<String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}

// Table literals for tests
#[cfg(test)]
impl<W: Into<String>> FromIterator<(W, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (W, u64)>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for (word, count) in iter {
            table.add(word, count).unwrap();
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_get() {
        let mut table = FrequencyTable::new();
        table.record("cat");
        table.record("cat");
        table.record("sat");

        assert_eq!(table.get("cat"), 2);
        assert_eq!(table.get("sat"), 1);
        assert_eq!(table.get("dog"), 0);
        assert_eq!(table.len(), 2);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut table = FrequencyTable::new();
        table.add("ghost", 0).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_add_accumulates() {
        let mut table = FrequencyTable::new();
        table.add("cat", 2).unwrap();
        table.add("cat".to_string(), 3).unwrap();
        table.record("cat");

        assert_eq!(table.get("cat"), 6);
        assert_eq!(table.total(), 6);
    }

    #[test]
    fn test_add_overflow_leaves_table_unchanged() {
        let mut table = FrequencyTable::new();
        table.add("x", u64::MAX).unwrap();

        let before = table.clone();
        assert!(matches!(table.add("x", 1), Err(PipelineError::CountOverflow { .. })));
        assert!(matches!(table.add("y", 1), Err(PipelineError::CountOverflow { .. })));
        assert_eq!(table, before);
    }

    #[test]
    fn test_try_merge_sums_counts() {
        let mut a: FrequencyTable = [("the", 2), ("cat", 1)].into_iter().collect();
        let b: FrequencyTable = [("cat", 2), ("mat", 1)].into_iter().collect();

        a.try_merge(b).unwrap();

        assert_eq!(a.get("the"), 2);
        assert_eq!(a.get("cat"), 3);
        assert_eq!(a.get("mat"), 1);
        assert_eq!(a.total(), 6);
    }

    #[test]
    fn test_try_merge_into_empty() {
        let mut empty = FrequencyTable::new();
        let other: FrequencyTable = [("a", 5)].into_iter().collect();
        empty.try_merge(other.clone()).unwrap();
        assert_eq!(empty, other);
    }

    #[test]
    fn test_try_merge_overflow_is_all_or_nothing() {
        let mut global: FrequencyTable = [("a", 1), ("big", u64::MAX - 10)].into_iter().collect();
        let before = global.clone();

        let word_overflow: FrequencyTable = [("a", 1), ("big", 11)].into_iter().collect();
        match global.try_merge(word_overflow) {
            Err(PipelineError::CountOverflow { word }) => assert_eq!(word, "big"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(global, before);

        // No single word overflows, the sum of all counts does
        let total_overflow: FrequencyTable = [("c", 5), ("d", 5)].into_iter().collect();
        assert!(global.try_merge(total_overflow).is_err());
        assert_eq!(global, before);
    }

    #[test]
    fn test_sorted_by_count() {
        let table: FrequencyTable = [("a", 2), ("cat", 3), ("the", 2), ("on", 1)]
            .into_iter()
            .collect();

        let sorted = table.sorted_by_count();
        assert_eq!(sorted, vec![("cat", 3), ("a", 2), ("the", 2), ("on", 1)]);
    }

    #[test]
    fn test_iteration_is_word_ordered() {
        let table: FrequencyTable = [("zebra", 1), ("apple", 1), ("mango", 1)]
            .into_iter()
            .collect();
        let words: Vec<&String> = table.iter().map(|(w, _)| w).collect();
        assert_eq!(words, vec!["apple", "mango", "zebra"]);
    }
}
