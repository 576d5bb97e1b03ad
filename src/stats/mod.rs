//! Counting results and per-participant statistics
//!
//! - `table`: the word frequency table every stage produces and consumes
//! - `aggregator`: folds per-participant statistics into a run report

pub mod aggregator;
pub mod table;

pub use table::FrequencyTable;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Statistics for one participant's local counting stage
///
/// Non-coordinator participants send this with their partial table so the
/// coordinator can report how the work was spread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantStats {
    /// Participant index (0 = coordinator)
    pub participant_index: usize,

    /// Node identifier (hostname)
    pub node_id: String,

    /// Lines in the participant's block
    pub lines: u64,

    /// Normalized tokens counted
    pub tokens: u64,

    /// Distinct words in the local table
    pub unique_words: u64,

    /// Counter threads used
    pub threads: usize,

    /// Time spent in the local counter (nanoseconds)
    pub count_duration_ns: u64,
}

impl ParticipantStats {
    /// Build stats from a participant's finished local table
    pub fn from_table(
        participant_index: usize,
        node_id: impl Into<String>,
        lines: usize,
        threads: usize,
        table: &FrequencyTable,
        count_duration: Duration,
    ) -> Self {
        Self {
            participant_index,
            node_id: node_id.into(),
            lines: lines as u64,
            tokens: table.total(),
            unique_words: table.len() as u64,
            threads,
            count_duration_ns: count_duration.as_nanos() as u64,
        }
    }

    /// Counting duration
    pub fn count_duration(&self) -> Duration {
        Duration::from_nanos(self.count_duration_ns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_table() {
        let table: FrequencyTable = [("the", 2), ("cat", 3)].into_iter().collect();
        let stats = ParticipantStats::from_table(1, "node-a", 2, 4, &table, Duration::from_millis(5));

        assert_eq!(stats.participant_index, 1);
        assert_eq!(stats.node_id, "node-a");
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.tokens, 5);
        assert_eq!(stats.unique_words, 2);
        assert_eq!(stats.threads, 4);
        assert_eq!(stats.count_duration(), Duration::from_millis(5));
    }
}
