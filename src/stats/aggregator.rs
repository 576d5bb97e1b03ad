//! Participant statistics aggregation
//!
//! The coordinator collects one `ParticipantStats` per participant while it
//! reduces their tables. The aggregator keeps them keyed by participant index
//! and produces a `RunReport` for the output sinks.
//!
//! # Example
//!
//! ```
//! use wordpulse::stats::{FrequencyTable, ParticipantStats, aggregator::StatisticsAggregator};
//! use std::time::Duration;
//!
//! let mut table = FrequencyTable::new();
//! table.record("cat");
//! table.record("cat");
//!
//! let mut aggregator = StatisticsAggregator::new();
//! aggregator.add_participant(ParticipantStats::from_table(0, "a", 1, 1, &table, Duration::ZERO));
//! aggregator.add_participant(ParticipantStats::from_table(1, "b", 1, 1, &table, Duration::ZERO));
//!
//! let report = aggregator.report(Duration::from_secs(1));
//! assert_eq!(report.total_lines, 2);
//! assert_eq!(report.total_tokens, 4);
//! ```

use crate::stats::ParticipantStats;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Statistics aggregator for all participants of one run
#[derive(Debug, Default)]
pub struct StatisticsAggregator {
    /// Per-participant statistics (participant index → stats)
    participants: BTreeMap<usize, ParticipantStats>,
}

impl StatisticsAggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self {
            participants: BTreeMap::new(),
        }
    }

    /// Add statistics for one participant
    ///
    /// A second entry for the same index replaces the first.
    pub fn add_participant(&mut self, stats: ParticipantStats) {
        self.participants.insert(stats.participant_index, stats);
    }

    /// Build the run report
    pub fn report(&self, elapsed: Duration) -> RunReport {
        let per_participant: Vec<ParticipantStats> = self.participants.values().cloned().collect();

        let total_lines = per_participant.iter().map(|p| p.lines).sum();
        let total_tokens = per_participant.iter().map(|p| p.tokens).sum();

        let max_lines = per_participant.iter().map(|p| p.lines).max().unwrap_or(0);
        let min_lines = per_participant.iter().map(|p| p.lines).min().unwrap_or(0);

        RunReport {
            participants: per_participant.len(),
            total_lines,
            total_tokens,
            line_imbalance: max_lines - min_lines,
            elapsed_ns: elapsed.as_nanos() as u64,
            per_participant,
        }
    }
}

/// Summary of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Number of participants
    pub participants: usize,

    /// Lines counted across all participants
    pub total_lines: u64,

    /// Tokens counted across all participants
    pub total_tokens: u64,

    /// Largest minus smallest block size
    pub line_imbalance: u64,

    /// Wall-clock time of the whole run (nanoseconds)
    pub elapsed_ns: u64,

    /// Per-participant statistics in index order
    pub per_participant: Vec<ParticipantStats>,
}

impl RunReport {
    /// Wall-clock time of the whole run
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_ns)
    }

    /// Replace the measured elapsed time
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed_ns = elapsed.as_nanos() as u64;
        self
    }
}
