//! Common error types for taskdeck
//!
//! Defines the shared error enum using thiserror for clear error propagation.
//! A failed phase is fatal for the pass: errors propagate to the orchestrator,
//! which reports and exits without attempting further mutations.

use thiserror::Error;

/// Common result type for taskdeck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the sync pass
#[derive(Error, Debug)]
pub enum Error {
    /// Network or auth failure talking to an external system
    #[error("{system} unavailable: {reason}")]
    SourceUnavailable {
        /// Which external system failed ("task manager" or "board")
        system: &'static str,
        /// Underlying failure description
        reason: String,
    },

    /// The board rejected a card batch (e.g. unknown type id)
    #[error("Board rejected card batch (HTTP {status}): {message}")]
    ValidationRejected {
        /// HTTP status returned by the board
        status: u16,
        /// Server-provided rejection message
        message: String,
    },

    /// A task's context has no entry in the configured context → type-id map
    #[error("No card type configured for context '{0}'")]
    UnmappedContext(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid due-date expression from the CLI
    #[error("Invalid date expression: {0}")]
    InvalidDate(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
