//! Single-process runs
//!
//! Runs every participant of a pipeline inside one process. Participants
//! `1..P` are tokio tasks connected to the coordinator by in-memory duplex
//! streams, so they speak exactly the protocol a TCP participant does.

use crate::distributed::coordinator::{DistributedCoordinator, PipelineOutcome};
use crate::distributed::node_service::serve_participant;
use anyhow::{Context, Result};
use tokio::io::DuplexStream;
use tracing::warn;

/// In-memory link buffer per participant
const LINK_BUFFER_SIZE: usize = 64 * 1024;

/// Run the whole pipeline in this process with `participants` participants
pub async fn run_local(lines: Vec<String>, participants: usize, threads: usize) -> Result<PipelineOutcome> {
    if participants == 0 {
        anyhow::bail!("At least one participant is required");
    }

    let mut links: Vec<DuplexStream> = Vec::with_capacity(participants - 1);
    let mut handles = Vec::with_capacity(participants - 1);

    for index in 1..participants {
        let (coordinator_end, mut participant_end) = tokio::io::duplex(LINK_BUFFER_SIZE);
        links.push(coordinator_end);

        let node_id = format!("local-{}", index);
        handles.push(tokio::spawn(async move {
            serve_participant(&mut participant_end, &node_id, None).await
        }));
    }

    let coordinator = DistributedCoordinator::new(threads).with_node_id("local-0");
    let outcome = coordinator.run(lines, links).await;

    let mut participant_failure = None;
    for (offset, handle) in handles.into_iter().enumerate() {
        let result = handle
            .await
            .with_context(|| format!("Participant {} task failed", offset + 1))
            .and_then(|r| r);

        if let Err(e) = result {
            warn!("Participant {} failed: {:#}", offset + 1, e);
            participant_failure.get_or_insert(e);
        }
    }

    let outcome = outcome?;
    if let Some(e) = participant_failure {
        return Err(e);
    }

    Ok(outcome)
}
