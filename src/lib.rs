//! WordPulse - Hybrid word frequency counter
//!
//! WordPulse counts normalized word occurrences in a text file by splitting
//! the lines across cooperating participants, counting each block on a pool
//! of threads and reducing the partial tables at a coordinator.
//!
//! # Architecture
//!
//! - **Partitioning**: near-equal contiguous line blocks, computed identically
//!   everywhere from the total line count
//! - **Distribution**: the coordinator sends each participant its block over a
//!   length-prefixed stream (TCP or in-memory)
//! - **Local counting**: scoped threads with private tables, merged once each
//! - **Reduction**: the coordinator folds partial tables in participant order

pub mod config;
pub mod distributed;
pub mod distribution;
pub mod error;
pub mod output;
pub mod stats;
pub mod util;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use error::{PipelineError, PipelineResult};
pub use stats::FrequencyTable;
pub use worker::LocalCounter;

/// Result type used throughout WordPulse
pub type Result<T> = anyhow::Result<T>;
