//! CLI argument parsing using clap

use super::{ExecutionMode, SortOrder};
use clap::Parser;
use std::path::PathBuf;

/// WordPulse - Hybrid multi-process, multi-threaded word frequency counter
#[derive(Parser, Debug)]
#[command(name = "wordpulse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Execution mode: standalone, coordinator, or service
    #[arg(long, value_enum)]
    pub mode: Option<ExecutionMode>,

    /// Port for the participant service to listen on (service mode only)
    #[arg(long)]
    pub listen_port: Option<u16>,

    /// Comma-separated list of participant addresses for coordinator mode (e.g., "10.0.1.10:9999,10.0.1.11:9999")
    #[arg(long)]
    pub host_list: Option<String>,

    /// File containing participant addresses (one per line, for coordinator mode)
    #[arg(long)]
    pub clients_file: Option<PathBuf>,

    /// Port to connect to on participants given without one (coordinator mode only)
    #[arg(long)]
    pub worker_port: Option<u16>,

    /// Input text file
    ///
    /// Not used in service mode (the coordinator sends the lines)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    // === Counter Options ===
    /// Counter threads per participant (service mode: override the coordinator's request)
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Number of participants (standalone mode)
    #[arg(short = 'n', long)]
    pub participants: Option<usize>,

    // === Service Options ===
    /// Exit after serving a single run (service mode only)
    #[arg(long)]
    pub once: bool,

    // === Output Options ===
    /// Table order
    #[arg(long, value_enum)]
    pub sort: Option<SortOrder>,

    /// Print only the first N entries
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Write a JSON report to this path
    #[arg(long, value_name = "PATH")]
    pub json_output: Option<PathBuf>,

    /// Print per-participant statistics after the table
    #[arg(long)]
    pub show_participants: bool,

    // === Configuration File ===
    /// TOML configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
