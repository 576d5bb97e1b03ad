//! Local parallel counter
//!
//! Counts the words of one participant's line block on a pool of scoped
//! worker threads.
//!
//! # Architecture
//!
//! - **Sharding**: the block is split into contiguous per-thread shards with
//!   the same near-equal split used to distribute lines across participants
//! - **Private accumulation**: each thread tokenizes its shard into its own
//!   `FrequencyTable`; nothing is shared while counting
//! - **Merge**: a finished thread locks the participant-local table once and
//!   folds its private table in
//!
//! # Example
//!
//! ```
//! use wordpulse::worker::LocalCounter;
//!
//! let lines = vec!["The cat.".to_string(), "the CAT sat.".to_string()];
//! let table = LocalCounter::new(2).count(&lines)?;
//!
//! assert_eq!(table.get("cat"), 2);
//! assert_eq!(table.get("the"), 2);
//! # Ok::<(), wordpulse::error::PipelineError>(())
//! ```

pub mod tokenizer;

pub use tokenizer::{AsciiTokenizer, Tokenizer};

use crate::distribution::assignments;
use crate::error::{PipelineError, PipelineResult};
use crate::stats::FrequencyTable;
use std::sync::Mutex;
use tracing::trace;

/// Multi-threaded word counter for one participant's block
#[derive(Debug, Clone)]
pub struct LocalCounter<T: Tokenizer = AsciiTokenizer> {
    /// Requested number of worker threads
    threads: usize,

    /// Line tokenizer shared by all threads
    tokenizer: T,
}

impl LocalCounter<AsciiTokenizer> {
    /// Create a counter with the default tokenizer
    pub fn new(threads: usize) -> Self {
        Self::with_tokenizer(threads, AsciiTokenizer)
    }
}

impl<T: Tokenizer> LocalCounter<T> {
    /// Create a counter with a custom tokenizer
    pub fn with_tokenizer(threads: usize, tokenizer: T) -> Self {
        Self {
            threads: threads.max(1),
            tokenizer,
        }
    }

    /// Requested number of worker threads
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Threads actually spawned for a block of `lines` lines
    ///
    /// Never more threads than lines, never fewer than one.
    pub fn effective_threads(&self, lines: usize) -> usize {
        self.threads.min(lines.max(1))
    }

    /// Count the words in `lines`
    ///
    /// Every line is tokenized by exactly one thread. The result does not
    /// depend on the thread count or on the order threads finish in.
    pub fn count(&self, lines: &[String]) -> PipelineResult<FrequencyTable> {
        let shards = assignments(lines.len(), self.effective_threads(lines.len()))?;
        let local = Mutex::new(FrequencyTable::new());

        let outcome = crossbeam::thread::scope(|scope| -> PipelineResult<()> {
            let handles: Vec<_> = shards
                .into_iter()
                .enumerate()
                .map(|(worker_id, shard)| {
                    let shard_lines = &lines[shard.range()];
                    let tokenizer = &self.tokenizer;
                    let local = &local;

                    scope.spawn(move |_| -> PipelineResult<()> {
                        let private = count_lines(tokenizer, shard_lines);
                        trace!(
                            worker_id,
                            lines = shard_lines.len(),
                            unique = private.len(),
                            "shard counted"
                        );

                        if private.is_empty() {
                            return Ok(());
                        }

                        let mut table = local.lock().map_err(|_| PipelineError::WorkerPanicked)?;
                        table.try_merge(private)
                    })
                })
                .collect();

            for handle in handles {
                handle.join().map_err(|_| PipelineError::WorkerPanicked)??;
            }
            Ok(())
        })
        .map_err(|_| PipelineError::WorkerPanicked)?;
        outcome?;

        local.into_inner().map_err(|_| PipelineError::WorkerPanicked)
    }
}

/// Count `lines` on the calling thread
pub fn count_lines<T: Tokenizer + ?Sized>(tokenizer: &T, lines: &[String]) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for line in lines {
        for word in tokenizer.tokenize(line) {
            table.record(&word);
        }
    }
    table
}
