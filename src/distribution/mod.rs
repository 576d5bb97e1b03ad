//! Line distribution across participants
//!
//! Splits `N` lines into `P` contiguous, non-overlapping ranges whose sizes
//! differ by at most one line. The first `N % P` participants take the extra
//! lines. The same split is used one level down to cut a participant's block
//! into per-thread shards.
//!
//! # Example
//!
//! ```
//! use wordpulse::distribution::{assignments, Assignment};
//!
//! let ranges = assignments(3, 2).unwrap();
//! assert_eq!(ranges, vec![Assignment { start: 0, count: 2 }, Assignment { start: 2, count: 1 }]);
//! ```

use crate::error::{PipelineError, PipelineResult};
use std::ops::Range;

/// Contiguous line range assigned to one participant (or thread)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    /// First line index
    pub start: usize,
    /// Number of lines
    pub count: usize,
}

impl Assignment {
    /// One past the last line index
    pub fn end(&self) -> usize {
        self.start + self.count
    }

    /// Index range covered by this assignment
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Compute the assignment of participant `index` out of `participants`
pub fn partition(total_lines: usize, participants: usize, index: usize) -> PipelineResult<Assignment> {
    if participants == 0 {
        return Err(PipelineError::InvalidPartition(
            "participant count must be at least 1".to_string(),
        ));
    }
    if index >= participants {
        return Err(PipelineError::InvalidPartition(format!(
            "participant index {} out of range for {} participants",
            index, participants
        )));
    }

    let base = total_lines / participants;
    let extra = total_lines % participants;

    Ok(Assignment {
        start: index * base + index.min(extra),
        count: base + usize::from(index < extra),
    })
}

/// Compute every participant's assignment, in index order
pub fn assignments(total_lines: usize, participants: usize) -> PipelineResult<Vec<Assignment>> {
    (0..participants)
        .map(|index| partition(total_lines, participants, index))
        .collect()
}
