//! Error types for the queue crate.

use thiserror::Error;

use crate::entry::{EntryId, EntryStatus};

/// Result type alias for queue operations.
pub type Result<T> = std::result::Result<T, QueueError>;

/// Errors that can occur during queue operations.
#[derive(Debug, Error)]
pub enum QueueError {
    /// A status change the state machine does not permit
    #[error("invalid status transition {from} -> {to}")]
    InvalidTransition {
        /// Status before the rejected transition
        from: EntryStatus,
        /// Requested target status
        to: EntryStatus,
    },

    /// Export requested for an entry without a converted payload
    #[error("entry {0} has no converted payload to export")]
    NotCompleted(EntryId),

    /// Configuration file problem
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
