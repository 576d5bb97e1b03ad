//! Final reduction
//!
//! Every non-coordinator participant sends a COMPLETE message followed by its
//! partial table. The coordinator seeds the global table with a copy of its
//! own local table and folds each partial table in, receiving from
//! participants strictly in index order. Count addition is commutative, so
//! the order only fixes the receive sequence, never the result.

use crate::distributed::codec::{encode_table, merge_table_payload};
use crate::distributed::protocol::*;
use crate::error::PipelineError;
use crate::stats::{FrequencyTable, ParticipantStats};
use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

/// Outcome of the reduction at the coordinator
#[derive(Debug, Clone)]
pub struct Reduction {
    /// Global frequency table
    pub table: FrequencyTable,

    /// Statistics received from participants `1..P`, in index order
    pub participants: Vec<ParticipantStats>,
}

/// Send this participant's local table to the coordinator
pub async fn send_partial_table<S>(link: &mut S, stats: ParticipantStats, table: &FrequencyTable) -> Result<()>
where
    S: AsyncWrite + Unpin,
{
    let participant_index = stats.participant_index;

    write_message(link, &Message::Complete(CompleteMessage { stats }))
        .await
        .context("Failed to send completion message")?;

    let payload = encode_table(table);
    write_frame(link, payload.as_bytes())
        .await
        .context("Failed to send partial table")?;

    debug!(participant_index, words = table.len(), bytes = payload.len(), "partial table sent");
    Ok(())
}

/// Report a failure to the coordinator in place of the partial table
pub async fn send_error<S>(link: &mut S, participant_index: usize, node_id: &str, error: &anyhow::Error) -> Result<()>
where
    S: AsyncWrite + Unpin,
{
    let msg = Message::Error(ErrorMessage {
        participant_index,
        node_id: node_id.to_string(),
        error: format!("{:#}", error),
    });

    write_message(link, &msg).await.context("Failed to send error message")
}

/// Fold every participant's partial table into the coordinator's local table
///
/// `links[k]` is the link to participant `k + 1`. The local table is cloned,
/// never modified.
pub async fn reduce<S>(local: &FrequencyTable, links: &mut [S]) -> Result<Reduction>
where
    S: AsyncRead + Unpin,
{
    let mut global = local.clone();
    let mut participants = Vec::with_capacity(links.len());

    for (offset, link) in links.iter_mut().enumerate() {
        let participant_index = offset + 1;

        let stats = match read_message(link)
            .await
            .with_context(|| format!("Failed to receive result from participant {}", participant_index))?
        {
            Message::Complete(msg) => msg.stats,
            Message::Error(err) => {
                return Err(PipelineError::ParticipantFailed {
                    index: participant_index,
                    node_id: err.node_id,
                    message: err.error,
                }
                .into())
            }
            other => {
                return Err(PipelineError::UnexpectedMessage {
                    expected: "COMPLETE",
                    got: other.kind().to_string(),
                }
                .into())
            }
        };

        if stats.participant_index != participant_index {
            anyhow::bail!(
                "Participant {} reported itself as participant {}",
                participant_index,
                stats.participant_index
            );
        }

        let payload = read_frame(link, MAX_FRAME_LEN)
            .await
            .with_context(|| format!("Failed to receive partial table from participant {}", participant_index))?;
        merge_table_payload(&mut global, &payload)
            .with_context(|| format!("Invalid partial table from participant {}", participant_index))?;

        debug!(participant_index, node_id = %stats.node_id, tokens = stats.tokens, "partial table merged");
        participants.push(stats);
    }

    Ok(Reduction {
        table: global,
        participants,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn table(entries: &[(&str, u64)]) -> FrequencyTable {
        entries.iter().map(|&(w, c)| (w, c)).collect()
    }

    fn stats(index: usize, t: &FrequencyTable) -> ParticipantStats {
        ParticipantStats::from_table(index, format!("node-{}", index), 1, 1, t, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_reduce_merges_in_order() {
        let local = table(&[("the", 2), ("cat", 2), ("sat", 1)]);
        let remote = table(&[("a", 2), ("cat", 1), ("sat", 1), ("on", 1), ("mat", 1)]);

        let (mut coord, mut part) = tokio::io::duplex(4096);
        send_partial_table(&mut part, stats(1, &remote), &remote).await.unwrap();

        let mut links = [&mut coord];
        let reduction = reduce(&local, &mut links).await.unwrap();

        let expected = table(&[("the", 2), ("cat", 3), ("sat", 2), ("a", 2), ("on", 1), ("mat", 1)]);
        assert_eq!(reduction.table, expected);
        assert_eq!(reduction.participants.len(), 1);
        assert_eq!(reduction.participants[0].participant_index, 1);

        // Seeding copies the local table
        assert_eq!(local.get("cat"), 2);
    }

    #[tokio::test]
    async fn test_reduce_no_participants() {
        let local = table(&[("solo", 1)]);
        let mut links: [tokio::io::DuplexStream; 0] = [];

        let reduction = reduce(&local, &mut links).await.unwrap();
        assert_eq!(reduction.table, local);
        assert!(reduction.participants.is_empty());
    }

    #[tokio::test]
    async fn test_reduce_empty_partial_table() {
        let (mut coord, mut part) = tokio::io::duplex(4096);
        let empty = FrequencyTable::new();
        send_partial_table(&mut part, stats(1, &empty), &empty).await.unwrap();

        let mut links = [&mut coord];
        let reduction = reduce(&empty, &mut links).await.unwrap();
        assert!(reduction.table.is_empty());
    }

    #[tokio::test]
    async fn test_reduce_malformed_payload_is_fatal() {
        let (mut coord, mut part) = tokio::io::duplex(4096);
        let t = table(&[("cat", 1)]);
        write_message(&mut part, &Message::Complete(CompleteMessage { stats: stats(1, &t) }))
            .await
            .unwrap();
        write_frame(&mut part, b"cat 1\ncat\n").await.unwrap();

        let mut links = [&mut coord];
        let err = reduce(&FrequencyTable::new(), &mut links).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MalformedTable { line: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_reduce_participant_error() {
        let (mut coord, mut part) = tokio::io::duplex(4096);
        send_error(&mut part, 1, "node-1", &anyhow::anyhow!("disk on fire"))
            .await
            .unwrap();

        let mut links = [&mut coord];
        let err = reduce(&FrequencyTable::new(), &mut links).await.unwrap_err();

        match err.downcast_ref::<PipelineError>() {
            Some(PipelineError::ParticipantFailed { index, message, .. }) => {
                assert_eq!(*index, 1);
                assert!(message.contains("disk on fire"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reduce_rejects_wrong_identity() {
        let (mut coord, mut part) = tokio::io::duplex(4096);
        let t = table(&[("x", 1)]);
        send_partial_table(&mut part, stats(5, &t), &t).await.unwrap();

        let mut links = [&mut coord];
        assert!(reduce(&FrequencyTable::new(), &mut links).await.is_err());
    }

    #[tokio::test]
    async fn test_reduce_disconnect_is_fatal() {
        let (mut coord, part) = tokio::io::duplex(64);
        drop(part);

        let mut links = [&mut coord];
        let err = reduce(&FrequencyTable::new(), &mut links).await.unwrap_err();
        assert!(format!("{:#}", err).contains("participant 1"));
    }
}
