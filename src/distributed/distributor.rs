//! Line distribution
//!
//! Moves each participant's contiguous line block from the coordinator, which
//! alone holds the input, into that participant's memory.
//!
//! Coordinator side: broadcast the assignment (total line count and identity)
//! to every participant, then send each one its block as a single frame. The
//! coordinator's own block is sliced from memory and never transferred.
//!
//! Participant side: receive the assignment, then the block, split it back
//! into lines and check it against the locally computed partition.

use crate::distributed::codec::{decode_line_block, encode_lines};
use crate::distributed::protocol::*;
use crate::distribution::{assignments, partition};
use crate::error::{PipelineError, PipelineResult};
use anyhow::{Context, Result};
use rayon::prelude::*;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

/// Send the assignment message to every participant
///
/// `links[k]` is the link to participant `k + 1`.
pub async fn broadcast_assignments<S>(links: &mut [S], total_lines: usize, threads: usize) -> Result<()>
where
    S: AsyncWrite + Unpin,
{
    let participant_count = links.len() + 1;

    for (offset, link) in links.iter_mut().enumerate() {
        let participant_index = offset + 1;
        let msg = Message::Assign(AssignMessage {
            protocol_version: PROTOCOL_VERSION,
            participant_index,
            participant_count,
            total_lines: total_lines as u64,
            threads,
        });

        write_message(link, &msg)
            .await
            .with_context(|| format!("Failed to send assignment to participant {}", participant_index))?;
    }

    debug!(participant_count, total_lines, "assignments broadcast");
    Ok(())
}

/// Encode the line blocks of participants `1..P`
///
/// Blocks are independent, so they are encoded in parallel.
pub fn encode_blocks(lines: &[String], participant_count: usize) -> PipelineResult<Vec<String>> {
    let ranges = assignments(lines.len(), participant_count)?;

    Ok(ranges
        .par_iter()
        .skip(1)
        .map(|assignment| encode_lines(&lines[assignment.range()]))
        .collect())
}

/// Send every participant its line block
pub async fn send_blocks<S>(links: &mut [S], lines: &[String]) -> Result<()>
where
    S: AsyncWrite + Unpin,
{
    let blocks = encode_blocks(lines, links.len() + 1)?;

    for (offset, (link, block)) in links.iter_mut().zip(blocks).enumerate() {
        let participant_index = offset + 1;
        write_frame(link, block.as_bytes())
            .await
            .with_context(|| format!("Failed to send line block to participant {}", participant_index))?;
        debug!(participant_index, bytes = block.len(), "line block sent");
    }

    Ok(())
}

/// The coordinator's own block, taken directly from memory
pub fn coordinator_block(lines: &[String], participant_count: usize) -> PipelineResult<&[String]> {
    let assignment = partition(lines.len(), participant_count, 0)?;
    Ok(&lines[assignment.range()])
}

/// Receive the assignment message
pub async fn receive_assignment<S>(link: &mut S) -> Result<AssignMessage>
where
    S: AsyncRead + Unpin,
{
    let assign = match read_message(link).await.context("Failed to receive assignment")? {
        Message::Assign(assign) => assign,
        other => {
            return Err(PipelineError::UnexpectedMessage {
                expected: "ASSIGN",
                got: other.kind().to_string(),
            }
            .into())
        }
    };

    Ok(assign)
}

/// Check an assignment before acting on it
pub fn validate_assignment(assign: &AssignMessage) -> PipelineResult<()> {
    if assign.protocol_version != PROTOCOL_VERSION {
        return Err(PipelineError::ProtocolMismatch {
            coordinator: assign.protocol_version,
            participant: PROTOCOL_VERSION,
        });
    }

    if assign.participant_index == 0 || assign.participant_index >= assign.participant_count {
        return Err(PipelineError::InvalidPartition(format!(
            "participant index {} invalid for {} participants",
            assign.participant_index, assign.participant_count
        )));
    }

    Ok(())
}

/// Receive this participant's line block
///
/// The receive buffer is dropped as soon as the block is split into lines.
pub async fn receive_block<S>(link: &mut S, assign: &AssignMessage) -> Result<Vec<String>>
where
    S: AsyncRead + Unpin,
{
    let expected = partition(
        assign.total_lines as usize,
        assign.participant_count,
        assign.participant_index,
    )?;

    let payload = read_frame(link, MAX_FRAME_LEN)
        .await
        .context("Failed to receive line block")?;
    let lines = decode_line_block(&payload)?;
    drop(payload);

    if lines.len() != expected.count {
        return Err(PipelineError::BlockMismatch {
            expected: expected.count,
            received: lines.len(),
        }
        .into());
    }

    debug!(
        participant_index = assign.participant_index,
        start = expected.start,
        lines = lines.len(),
        "line block received"
    );
    Ok(lines)
}
