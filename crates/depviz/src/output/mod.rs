//! Rendering of a discovered edge list.
//!
//! The discovery engine hands its final edge list to a [`Serializer`]
//! exactly once. Three formats are available:
//!
//! - [`dot`]: Graphviz `digraph` with numbered nodes
//! - [`json`]: pretty-printed array of `{"from", "to"}` objects
//! - [`tree`]: indented dependency tree for terminals

mod color;
pub mod dot;
pub mod json;
pub mod tree;

pub use dot::DotSerializer;
pub use json::JsonSerializer;
pub use tree::TreeSerializer;

use crate::domain::Edge;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use tokio::io::AsyncWrite;

/// Turns an edge list into text on an async sink (stdout, a file, a buffer).
#[async_trait]
pub trait Serializer: Send + Sync {
    /// Write `edges` to `out` and flush it.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    async fn serialize(&self, edges: &[Edge], out: &mut (dyn AsyncWrite + Unpin + Send)) -> Result<()>;
}

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Graphviz DOT.
    #[default]
    Dot,
    /// JSON edge list.
    Json,
    /// Indented tree.
    Tree,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dot => f.write_str("dot"),
            Self::Json => f.write_str("json"),
            Self::Tree => f.write_str("tree"),
        }
    }
}

/// Create the serializer for `format`.
#[must_use]
pub fn serializer_for(format: OutputFormat, config: OutputConfig) -> Box<dyn Serializer> {
    match format {
        OutputFormat::Dot => Box::new(DotSerializer::new()),
        OutputFormat::Json => Box::new(JsonSerializer),
        OutputFormat::Tree => Box::new(TreeSerializer::new(config)),
    }
}

/// Settings for human-oriented output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use ASCII-only connectors instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create an `OutputConfig` with explicit values.
    #[must_use]
    pub fn new(use_ascii: bool, use_colors: bool) -> Self {
        Self {
            use_ascii,
            use_colors,
        }
    }

    /// Plain ASCII without colors, for files and pipes.
    #[must_use]
    pub fn plain() -> Self {
        Self::new(true, false)
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `DEPVIZ_ASCII`: Set to "1" or "true" for ASCII-only connectors
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `DEPVIZ_COLOR`: Set to "0" or "false" to disable colors
    #[must_use]
    pub fn from_env() -> Self {
        let use_ascii = match env::var("DEPVIZ_ASCII") {
            Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Ok(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Ok(v) => {
                tracing::warn!(
                    env_var = "DEPVIZ_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            Err(_) => false,
        };

        // https://no-color.org/
        let use_colors = env::var_os("NO_COLOR").is_none()
            && env::var("DEPVIZ_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self {
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(false, true)
    }
}
