//! Error types for depviz operations.

use crate::domain::PackageId;
use crate::provider::FetchError;
use std::io;
use thiserror::Error;

/// The error type for depviz operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The traversal was stopped because the caller cancelled it.
    #[error("Dependency discovery was cancelled")]
    Cancelled,

    /// A registry lookup failed; the whole traversal was aborted.
    #[error("Failed to fetch dependencies of '{package}': {source}")]
    Fetch {
        /// The package whose lookup failed.
        package: PackageId,
        /// What went wrong in the registry adapter.
        #[source]
        source: FetchError,
    },

    /// A worker task died without reporting a result.
    #[error("Worker task failed: {0}")]
    Worker(String),

    /// Invalid input, such as an empty root package name.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Writing the DOT output failed.
    #[error("Output error: {0}")]
    Output(#[from] depviz_dot::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` if this is a cancellation rather than a failure.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// A specialized Result type for depviz operations.
pub type Result<T> = std::result::Result<T, Error>;
