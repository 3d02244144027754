//! Error types for depviz-dot operations.

use std::io;
use thiserror::Error;

/// The error type for depviz-dot operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while writing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A statement was written out of order (e.g. an edge before the graph
    /// header, or anything after the closing brace).
    #[error("Invalid DOT writer state: {0}")]
    InvalidState(String),
}

/// A specialized Result type for depviz-dot operations.
pub type Result<T> = std::result::Result<T, Error>;
