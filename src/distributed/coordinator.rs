//! Distributed coordinator
//!
//! The coordinator is participant 0. It:
//! - Connects to all participants
//! - Broadcasts the total line count and each participant's identity
//! - Distributes line blocks
//! - Counts its own block
//! - Reduces every partial table into the global table

use crate::distributed::distributor::{broadcast_assignments, coordinator_block, send_blocks};
use crate::distributed::reducer::reduce;
use crate::stats::aggregator::{RunReport, StatisticsAggregator};
use crate::stats::{FrequencyTable, ParticipantStats};
use crate::worker::LocalCounter;
use anyhow::{Context, Result};
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::info;

/// Result of one complete pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Global frequency table
    pub table: FrequencyTable,

    /// Run statistics
    pub report: RunReport,
}

/// Distributed coordinator
///
/// Orchestrates one counting run across all participants.
pub struct DistributedCoordinator {
    /// Counter threads per participant
    threads: usize,

    /// Node identifier reported for participant 0
    node_id: String,
}

impl DistributedCoordinator {
    /// Create a new coordinator
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
            node_id: crate::util::node_id(),
        }
    }

    /// Override the node identifier
    pub fn with_node_id(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = node_id.into();
        self
    }

    /// Connect to every participant, in index order
    ///
    /// `addresses[k]` becomes participant `k + 1`.
    pub async fn connect(addresses: &[String]) -> Result<Vec<TcpStream>> {
        let mut connections = Vec::with_capacity(addresses.len());

        for (offset, addr) in addresses.iter().enumerate() {
            info!("Connecting to participant {} at {}...", offset + 1, addr);
            let stream = TcpStream::connect(addr)
                .await
                .with_context(|| format!("Failed to connect to {}", addr))?;
            stream
                .set_nodelay(true)
                .with_context(|| format!("Failed to configure connection to {}", addr))?;
            connections.push(stream);
        }

        info!("All {} participants connected", connections.len());
        Ok(connections)
    }

    /// Run the pipeline over `lines` with one link per non-coordinator participant
    pub async fn run<S>(&self, lines: Vec<String>, mut links: Vec<S>) -> Result<PipelineOutcome>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let start = Instant::now();
        let participant_count = links.len() + 1;
        let total_lines = lines.len();

        info!(
            "Counting {} lines across {} participants ({} threads each)",
            total_lines, participant_count, self.threads
        );

        broadcast_assignments(&mut links, total_lines, self.threads).await?;
        send_blocks(&mut links, &lines).await?;

        let block = coordinator_block(&lines, participant_count)?.to_vec();
        drop(lines);

        let (local, stats) = self.count_own_block(block).await?;
        info!(
            "Participant 0 counted {} lines ({} tokens)",
            stats.lines, stats.tokens
        );

        let reduction = reduce(&local, &mut links).await?;
        drop(local);

        let mut aggregator = StatisticsAggregator::new();
        aggregator.add_participant(stats);
        for participant in reduction.participants {
            aggregator.add_participant(participant);
        }

        let report = aggregator.report(start.elapsed());
        info!(
            "Reduction complete: {} unique words, {} tokens",
            reduction.table.len(),
            reduction.table.total()
        );

        Ok(PipelineOutcome {
            table: reduction.table,
            report,
        })
    }

    /// Count the coordinator's own block off the async runtime
    async fn count_own_block(&self, block: Vec<String>) -> Result<(FrequencyTable, ParticipantStats)> {
        let counter = LocalCounter::new(self.threads);
        let node_id = self.node_id.clone();

        tokio::task::spawn_blocking(move || -> Result<(FrequencyTable, ParticipantStats)> {
            let count_start = Instant::now();
            let table = counter.count(&block).context("Local counting failed")?;
            let stats = ParticipantStats::from_table(
                0,
                node_id,
                block.len(),
                counter.effective_threads(block.len()),
                &table,
                count_start.elapsed(),
            );
            Ok((table, stats))
        })
        .await
        .context("Counter task failed")?
    }
}
