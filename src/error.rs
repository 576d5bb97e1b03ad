//! Error types for the counting pipeline
//!
//! Orchestration code works with `anyhow::Result` and attaches context as it
//! goes. The variants here are the failures the pipeline itself can name:
//! every one of them is fatal to the run.

use thiserror::Error;

/// Pipeline error types
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Missing input or otherwise unusable invocation
    #[error("Usage error: {0}")]
    Usage(String),

    /// A send or receive between participants did not complete
    #[error("Transfer failed while {stage}: {source}")]
    Transfer {
        stage: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Frame length exceeds what the receiver accepts
    #[error("Frame too large: {len} bytes (max {max})")]
    FrameTooLarge { len: usize, max: usize },

    /// Partial-table payload could not be parsed
    #[error("Malformed partial table at line {line}: {reason}")]
    MalformedTable { line: usize, reason: String },

    /// A word's count, or the table total, no longer fits in `u64`
    #[error("Count overflow for word {word:?}")]
    CountOverflow { word: String },

    /// Payload bytes are not valid UTF-8
    #[error("Payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// Partition requested for an impossible participant layout
    #[error("Invalid partition: {0}")]
    InvalidPartition(String),

    /// Coordinator and participant speak different protocol versions
    #[error("Protocol version mismatch: coordinator={coordinator}, participant={participant}")]
    ProtocolMismatch { coordinator: u32, participant: u32 },

    /// A message arrived that the protocol does not allow at this point
    #[error("Unexpected message: expected {expected}, got {got}")]
    UnexpectedMessage { expected: &'static str, got: String },

    /// Received line block does not match the participant's assignment
    #[error("Line block mismatch: assigned {expected} lines, received {received}")]
    BlockMismatch { expected: usize, received: usize },

    /// A participant reported a failure instead of its partial table
    #[error("Participant {index} ({node_id}) failed: {message}")]
    ParticipantFailed {
        index: usize,
        node_id: String,
        message: String,
    },

    /// A counting thread panicked
    #[error("Counter thread panicked")]
    WorkerPanicked,
}

/// Result type for pipeline operations
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_table_message() {
        let err = PipelineError::MalformedTable {
            line: 3,
            reason: "missing count".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed partial table at line 3: missing count");
    }

    #[test]
    fn test_transfer_keeps_source() {
        use std::error::Error as _;

        let err = PipelineError::Transfer {
            stage: "reading frame length",
            source: std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "closed"),
        };
        assert!(err.to_string().contains("reading frame length"));
        assert!(err.source().is_some());
    }
}
