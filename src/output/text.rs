//! Human-readable text output
//!
//! The table and the elapsed-time line go to stdout. Log lines go to stderr,
//! so stdout can be piped straight into other tools.

use crate::config::{OutputConfig, SortOrder};
use crate::stats::aggregator::RunReport;
use crate::stats::FrequencyTable;
use crate::util::time::human_duration;
use std::time::Duration;

/// Table entries in the configured order, truncated to `top` when set
pub fn ordered_entries(table: &FrequencyTable, sort: SortOrder, top: Option<usize>) -> Vec<(&str, u64)> {
    let mut entries: Vec<(&str, u64)> = match sort {
        SortOrder::Word => table.iter().map(|(w, &c)| (w.as_str(), c)).collect(),
        SortOrder::Count => table.sorted_by_count(),
    };

    if let Some(limit) = top {
        entries.truncate(limit);
    }

    entries
}

/// Format the table as `word: count` lines
pub fn format_table(table: &FrequencyTable, sort: SortOrder, top: Option<usize>) -> Vec<String> {
    ordered_entries(table, sort, top)
        .into_iter()
        .map(|(word, count)| format!("{}: {}", word, count))
        .collect()
}

/// Format the elapsed-time line
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("Total Execution Time: {:.6} seconds", elapsed.as_secs_f64())
}

/// Format the per-participant summary
pub fn format_participants(report: &RunReport) -> Vec<String> {
    let mut lines = Vec::with_capacity(report.per_participant.len() + 4);

    lines.push(format!("Participants: {}", report.participants));
    for p in &report.per_participant {
        lines.push(format!(
            "  [{}] {}: {} lines, {} tokens, {} unique words, {} threads, counted in {}",
            p.participant_index,
            p.node_id,
            p.lines,
            p.tokens,
            p.unique_words,
            p.threads,
            human_duration(p.count_duration())
        ));
    }
    lines.push(format!(
        "Total: {} lines, {} tokens (line imbalance: {})",
        report.total_lines, report.total_tokens, report.line_imbalance
    ));

    lines
}

/// Print the run results to stdout
pub fn print_results(table: &FrequencyTable, report: &RunReport, output: &OutputConfig) {
    for line in format_table(table, output.sort, output.top) {
        println!("{}", line);
    }

    println!("{}", format_elapsed(report.elapsed()));

    if output.show_participants {
        println!();
        for line in format_participants(report) {
            println!("{}", line);
        }
    }
}
