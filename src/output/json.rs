//! JSON output formatting
//!
//! Serializes one run into a single report document:
//! - Generation timestamp and run layout
//! - Totals and elapsed time
//! - Per-participant statistics
//! - The global word table

use crate::config::{OutputConfig, SortOrder};
use crate::output::text::ordered_entries;
use crate::stats::aggregator::RunReport;
use crate::stats::{FrequencyTable, ParticipantStats};
use crate::Result;
use anyhow::Context;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Duration with both seconds and human-readable format
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuration {
    pub seconds: f64,
    pub human: String,
}

impl JsonDuration {
    pub fn from_duration(d: Duration) -> Self {
        Self {
            seconds: d.as_secs_f64(),
            human: crate::util::time::human_duration(d),
        }
    }
}

/// One table entry
#[derive(Debug, Clone, Serialize)]
pub struct JsonWordCount {
    pub word: String,
    pub count: u64,
}

/// Complete run report
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    /// RFC 3339 generation time
    pub generated_at: String,
    pub version: String,
    pub participants: usize,
    pub elapsed: JsonDuration,
    pub total_lines: u64,
    pub total_tokens: u64,
    pub unique_words: usize,
    pub line_imbalance: u64,
    pub sort: SortOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<usize>,
    pub per_participant: Vec<ParticipantStats>,
    pub words: Vec<JsonWordCount>,
}

/// Build the JSON report for a finished run
pub fn build_report(table: &FrequencyTable, report: &RunReport, output: &OutputConfig) -> JsonReport {
    let words = ordered_entries(table, output.sort, output.top)
        .into_iter()
        .map(|(word, count)| JsonWordCount {
            word: word.to_string(),
            count,
        })
        .collect();

    JsonReport {
        generated_at: chrono::Local::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        participants: report.participants,
        elapsed: JsonDuration::from_duration(report.elapsed()),
        total_lines: report.total_lines,
        total_tokens: report.total_tokens,
        unique_words: table.len(),
        line_imbalance: report.line_imbalance,
        sort: output.sort,
        top: output.top,
        per_participant: report.per_participant.clone(),
        words,
    }
}

/// Write JSON report to file
pub fn write_json_output(output_path: &Path, report: &JsonReport, pretty: bool) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create JSON output: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    if pretty {
        serde_json::to_writer_pretty(&mut writer, report)?;
    } else {
        serde_json::to_writer(&mut writer, report)?;
    }

    writer.flush()?;
    Ok(())
}
