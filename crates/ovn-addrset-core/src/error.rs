//! Error types for address set synchronization
//!
//! This module defines all error types used throughout the crate.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for address set operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// The database command exited unsuccessfully
    #[error("command `{command}` failed ({status}): {stderr}")]
    CommandFailed {
        /// The command line that was run
        command: String,
        /// Exit status as reported by the OS
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// The database command did not finish in time
    #[error("command timed out after {0:?}")]
    Timeout(Duration),

    /// Spawning or talking to the command failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The northbound database rejected an operation or returned a malformed row
    #[error("Northbound error: {0}")]
    Northbound(String),

    /// Annotation could not be decoded
    #[error("Annotation error: {0}")]
    Annotation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a command failure error
    pub fn command_failed(
        command: impl Into<String>,
        status: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            status: status.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a northbound error
    pub fn northbound(msg: impl Into<String>) -> Self {
        Self::Northbound(msg.into())
    }

    /// Create an annotation error
    pub fn annotation(msg: impl Into<String>) -> Self {
        Self::Annotation(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Standard error captured from a failed command, if any
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
