//! Distributed pipeline
//!
//! This module implements counting across multiple participants.
//!
//! # Architecture
//!
//! WordPulse uses a coordinator-participant architecture:
//!
//! - **Coordinator** (participant 0): holds the input, broadcasts the line
//!   count, distributes line blocks, counts its own block and reduces the
//!   partial tables into the global table
//! - **Participants** (`1..P`): receive a block, count it with the local
//!   parallel counter and return a partial table
//!
//! # Modules
//!
//! - `protocol`: Message definitions and length-prefixed framing
//! - `codec`: Text payloads for line blocks and partial tables
//! - `distributor`: Assignment broadcast and block transfer
//! - `reducer`: Partial-table collection and merge
//! - `coordinator`: Coordinator orchestration
//! - `node_service`: Participant side and TCP service
//! - `local`: All participants in one process over in-memory links

pub mod codec;
pub mod coordinator;
pub mod distributor;
pub mod local;
pub mod node_service;
pub mod protocol;
pub mod reducer;

// Re-export key types
pub use protocol::{AssignMessage, CompleteMessage, ErrorMessage, Message, PROTOCOL_VERSION};

pub use coordinator::{DistributedCoordinator, PipelineOutcome};
pub use local::run_local;
pub use node_service::{serve_participant, NodeService};
