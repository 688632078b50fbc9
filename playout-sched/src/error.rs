//! Error types for playout-sched
//!
//! Three operational classes:
//! - `Validation`: bad input (non-positive duration, empty timeline,
//!   out-of-range index). Rejected before any state changes.
//! - `Presentation`: the scene switcher failed. Fatal to the operator call
//!   that made it, never fatal to the poll loop.
//! - `InvalidState`: operation invoked from the wrong controller state.

use std::time::Duration;
use thiserror::Error;

/// Scene switcher failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PresentationError {
    /// Backend not reachable (connection lost, not connected yet)
    #[error("Scene switcher unavailable: {0}")]
    Unavailable(String),

    /// Backend refused an operation
    #[error("Scene switcher rejected {operation} for '{target}': {reason}")]
    Rejected {
        operation: &'static str,
        target: String,
        reason: String,
    },

    /// Backend did not answer in time
    #[error("Scene switcher timed out after {0:?}")]
    Timeout(Duration),
}

/// Main error type for playout-sched
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Scene switcher errors
    #[error("Presentation error: {0}")]
    Presentation(#[from] PresentationError),

    /// Invalid state for operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Schedule document (de)serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Errors from shared utilities
    #[error(transparent)]
    Common(#[from] playout_common::Error),
}

/// Convenience Result type using playout-sched Error
pub type Result<T> = std::result::Result<T, Error>;
