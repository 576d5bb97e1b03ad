//! WordPulse CLI entry point

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;
use tracing::info;
use wordpulse::config::cli::Cli;
use wordpulse::config::{Config, ExecutionMode};
use wordpulse::distributed::{run_local, DistributedCoordinator, NodeService, PipelineOutcome};
use wordpulse::output::{json, text};
use wordpulse::util::input::read_lines;
use wordpulse::PipelineError;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    wordpulse::util::logging::init_logging(cli.verbose);

    let config = wordpulse::config::toml::load_config(&cli)?;
    wordpulse::config::validator::validate_config(&config)
        .context("Configuration validation failed")?;

    let runtime = tokio::runtime::Runtime::new()
        .context("Failed to create tokio runtime")?;

    // Handle different execution modes
    match config.cluster.mode {
        ExecutionMode::Standalone => runtime.block_on(run_standalone(&config)),
        ExecutionMode::Coordinator => runtime.block_on(run_coordinator(&config)),
        ExecutionMode::Service => runtime.block_on(run_service(&config, cli.threads, cli.once)),
    }
}

/// Run in standalone mode (all participants in this process)
async fn run_standalone(config: &Config) -> Result<()> {
    let start = Instant::now();
    let lines = load_input(config)?;

    let outcome = run_local(lines, config.cluster.participants, config.counter.threads).await?;

    report(outcome, start, config)
}

/// Run in coordinator mode (participant 0 of a distributed run)
async fn run_coordinator(config: &Config) -> Result<()> {
    let node_addresses = config.cluster.node_addresses();
    info!("Coordinating {} remote participants", node_addresses.len());

    let start = Instant::now();
    let lines = load_input(config)?;

    let links = DistributedCoordinator::connect(&node_addresses).await?;
    let outcome = DistributedCoordinator::new(config.counter.threads)
        .run(lines, links)
        .await?;

    report(outcome, start, config)
}

/// Run in service mode (participant for a remote coordinator)
async fn run_service(config: &Config, threads: Option<usize>, once: bool) -> Result<()> {
    NodeService::new(config.cluster.listen_port)
        .with_threads(threads)
        .once(once)
        .run()
        .await
}

fn load_input(config: &Config) -> Result<Vec<String>> {
    let path: &Path = config
        .input
        .as_deref()
        .ok_or_else(|| PipelineError::Usage("no input file given".to_string()))?;

    let lines = read_lines(path)?;
    info!("Read {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

/// Print results and write the optional JSON report
fn report(outcome: PipelineOutcome, start: Instant, config: &Config) -> Result<()> {
    let run_report = outcome.report.with_elapsed(start.elapsed());

    text::print_results(&outcome.table, &run_report, &config.output);

    if let Some(ref path) = config.output.json_output {
        let json_report = json::build_report(&outcome.table, &run_report, &config.output);
        json::write_json_output(path, &json_report, true)?;
        info!("JSON report written to {}", path.display());
    }

    Ok(())
}
