//! Participant service
//!
//! This module implements the side of the protocol every non-coordinator
//! participant runs. The participant:
//! - Receives its assignment (index, participant count, total lines)
//! - Receives its line block
//! - Counts the block with the local parallel counter
//! - Sends its statistics and partial table back
//!
//! `NodeService` wraps this in a TCP listener for multi-process and
//! multi-host runs.

use crate::distributed::distributor::{receive_assignment, receive_block, validate_assignment};
use crate::distributed::protocol::AssignMessage;
use crate::distributed::reducer::{send_error, send_partial_table};
use crate::stats::ParticipantStats;
use crate::worker::LocalCounter;
use anyhow::{Context, Result};
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Participant service
///
/// Accepts coordinator connections and serves one pipeline run per connection.
pub struct NodeService {
    /// Port to listen on
    listen_port: u16,

    /// Node identifier (hostname)
    node_id: String,

    /// Local thread count, overriding the coordinator's request
    threads: Option<usize>,

    /// Exit after the first run
    once: bool,
}

impl NodeService {
    /// Create a new participant service
    pub fn new(listen_port: u16) -> Self {
        Self {
            listen_port,
            node_id: crate::util::node_id(),
            threads: None,
            once: false,
        }
    }

    /// Use a fixed number of counter threads
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// Stop after serving a single run
    pub fn once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    /// Run the service
    ///
    /// Listens on all interfaces and serves coordinator connections.
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.listen_port);
        let listener = TcpListener::bind(&addr)
            .await
            .context("Failed to bind participant service")?;

        info!("Participant service listening on port {}", self.listen_port);
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        info!("Node ID: {}", self.node_id);

        loop {
            info!("Waiting for coordinator connection...");
            let (mut stream, addr) = listener.accept().await.context("Failed to accept connection")?;
            stream.set_nodelay(true).context("Failed to configure connection")?;

            info!("Coordinator connected from: {}", addr);

            match serve_participant(&mut stream, &self.node_id, self.threads).await {
                Ok(stats) => info!(
                    "Run complete: participant {} counted {} lines ({} tokens)",
                    stats.participant_index, stats.lines, stats.tokens
                ),
                Err(e) if self.once => return Err(e),
                Err(e) => error!("Run failed: {:#}", e),
            }

            if self.once {
                return Ok(());
            }
        }
    }
}

/// Serve one pipeline run as a non-coordinator participant
///
/// Failures after the assignment arrives are reported to the coordinator
/// with an ERROR message before being returned.
pub async fn serve_participant<S>(link: &mut S, node_id: &str, threads: Option<usize>) -> Result<ParticipantStats>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let assign = receive_assignment(link).await?;

    match participate(link, &assign, node_id, threads).await {
        Ok(stats) => Ok(stats),
        Err(e) => {
            if let Err(send_err) = send_error(link, assign.participant_index, node_id, &e).await {
                warn!("Could not report failure to coordinator: {:#}", send_err);
            }
            Err(e)
        }
    }
}

async fn participate<S>(
    link: &mut S,
    assign: &AssignMessage,
    node_id: &str,
    threads: Option<usize>,
) -> Result<ParticipantStats>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    validate_assignment(assign)?;
    let participant_index = assign.participant_index;
    info!(
        "Assigned participant {} of {} ({} total lines)",
        participant_index, assign.participant_count, assign.total_lines
    );

    let block = receive_block(link, assign).await?;

    let counter = LocalCounter::new(threads.unwrap_or(assign.threads));
    let node_id_owned = node_id.to_string();
    let (table, stats) = tokio::task::spawn_blocking(move || -> Result<_> {
        let count_start = Instant::now();
        let table = counter.count(&block).context("Local counting failed")?;
        let stats = ParticipantStats::from_table(
            participant_index,
            node_id_owned,
            block.len(),
            counter.effective_threads(block.len()),
            &table,
            count_start.elapsed(),
        );
        Ok((table, stats))
    })
    .await
    .context("Counter task failed")??;

    send_partial_table(link, stats.clone(), &table).await?;
    Ok(stats)
}
