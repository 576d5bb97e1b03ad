//! Participant protocol
//!
//! This module defines how the coordinator and the other participants talk to
//! each other. Every transfer is a frame: an explicit length followed by
//! exactly that many bytes. Control messages are MessagePack (rmp-serde)
//! encoded inside a frame; line blocks and partial tables travel as plain text
//! frames (see `codec`).
//!
//! # Protocol Version
//!
//! Current version: 1
//!
//! # Message Flow
//!
//! ```text
//! Coordinator (0)                   Participant (i)
//!     |                                  |
//!     |-- ASSIGN(i, P, N, threads) ----->|   barrier 1: N is known
//!     |                                  |
//!     |-- frame: line block ------------>|   barrier 2: block received
//!     |                                  |
//!     |            (both count locally)  |
//!     |                                  |
//!     |<---------- COMPLETE(stats) ------|
//!     |<---------- frame: partial table -|   barrier 3: in index order
//! ```
//!
//! A participant that fails sends ERROR instead of COMPLETE.
//!
//! # Frame Format
//!
//! ```text
//! [4 bytes: payload length (little-endian u32)][N bytes: payload]
//! ```
//!
//! Control message frames are capped at `MAX_MESSAGE_LEN`.

use crate::error::{PipelineError, PipelineResult};
use crate::stats::ParticipantStats;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Protocol version
///
/// Coordinator and participants must have matching protocol versions.
pub const PROTOCOL_VERSION: u32 = 1;

/// Largest control message accepted (100 MiB)
pub const MAX_MESSAGE_LEN: usize = 100 * 1024 * 1024;

/// Largest data frame the length prefix can describe
pub const MAX_FRAME_LEN: usize = u32::MAX as usize;

/// Control message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Message {
    /// Assignment message (Coordinator → Participant)
    ///
    /// Carries the total line count and the participant's identity. Nothing
    /// else may happen on a link before this arrives.
    Assign(AssignMessage),

    /// Completion message (Participant → Coordinator)
    ///
    /// Sent after local counting, immediately followed by the partial-table
    /// frame.
    Complete(CompleteMessage),

    /// Error message (Participant → Coordinator)
    ///
    /// The coordinator aborts the run when it receives one.
    Error(ErrorMessage),
}

impl Message {
    /// Short name for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Assign(_) => "ASSIGN",
            Message::Complete(_) => "COMPLETE",
            Message::Error(_) => "ERROR",
        }
    }
}

/// Assignment message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignMessage {
    /// Protocol version (must match)
    pub protocol_version: u32,

    /// Index of the receiving participant (1..P-1)
    pub participant_index: usize,

    /// Total number of participants, coordinator included
    pub participant_count: usize,

    /// Total number of input lines
    pub total_lines: u64,

    /// Counter threads the coordinator asks for
    pub threads: usize,
}

/// Completion message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteMessage {
    /// Local counting statistics
    pub stats: ParticipantStats,
}

/// Error message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    /// Index of the failing participant
    pub participant_index: usize,

    /// Node identifier
    pub node_id: String,

    /// Error description
    pub error: String,
}

/// Encode a control message body (without the frame length)
pub fn encode_message(msg: &Message) -> Result<Vec<u8>> {
    rmp_serde::to_vec(msg).with_context(|| format!("Failed to serialize {} message", msg.kind()))
}

/// Decode a control message body
pub fn decode_message(buf: &[u8]) -> Result<Message> {
    rmp_serde::from_slice(buf).context("Failed to deserialize message")
}

/// Write one frame: length, then payload
pub async fn write_frame<W>(stream: &mut W, payload: &[u8]) -> PipelineResult<()>
where
    W: AsyncWrite + Unpin,
{
    if payload.len() > MAX_FRAME_LEN {
        return Err(PipelineError::FrameTooLarge {
            len: payload.len(),
            max: MAX_FRAME_LEN,
        });
    }

    let len = payload.len() as u32;
    stream
        .write_all(&len.to_le_bytes())
        .await
        .map_err(|source| PipelineError::Transfer {
            stage: "writing frame length",
            source,
        })?;
    stream
        .write_all(payload)
        .await
        .map_err(|source| PipelineError::Transfer {
            stage: "writing frame payload",
            source,
        })?;
    stream.flush().await.map_err(|source| PipelineError::Transfer {
        stage: "flushing stream",
        source,
    })?;

    Ok(())
}

/// Read one frame, rejecting payloads longer than `max_len`
///
/// The length is read in full before any payload byte is interpreted.
pub async fn read_frame<R>(stream: &mut R, max_len: usize) -> PipelineResult<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    stream
        .read_exact(&mut len_buf)
        .await
        .map_err(|source| PipelineError::Transfer {
            stage: "reading frame length",
            source,
        })?;

    let len = u32::from_le_bytes(len_buf) as usize;
    if len > max_len {
        return Err(PipelineError::FrameTooLarge { len, max: max_len });
    }

    let mut payload = vec![0u8; len];
    stream
        .read_exact(&mut payload)
        .await
        .map_err(|source| PipelineError::Transfer {
            stage: "reading frame payload",
            source,
        })?;

    Ok(payload)
}

/// Read a complete control message
pub async fn read_message<R>(stream: &mut R) -> Result<Message>
where
    R: AsyncRead + Unpin,
{
    let msg_buf = read_frame(stream, MAX_MESSAGE_LEN)
        .await
        .context("Failed to read message")?;

    decode_message(&msg_buf)
}

/// Write a control message
pub async fn write_message<W>(stream: &mut W, msg: &Message) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let msg_bytes = encode_message(msg)?;

    write_frame(stream, &msg_bytes)
        .await
        .with_context(|| format!("Failed to write {} message", msg.kind()))?;

    Ok(())
}
