//! Graphviz DOT output.
//!
//! ```text
//! digraph dependencies {
//! 	1 [label="fastapi"];
//! 	2 [label="starlette"];
//! 	1 -> 2;
//! }
//! ```
//!
//! Nodes are numbered from 1 in first-appearance order over the edge list,
//! so the same edge list always produces the same text.

use super::Serializer;
use crate::domain::{DependencyGraph, Edge};
use crate::error::Result;
use async_trait::async_trait;
use depviz_dot::DotWriter;
use tokio::io::AsyncWrite;

/// Name of the emitted graph.
pub const DEFAULT_GRAPH_NAME: &str = "dependencies";

/// Writes the edge list as a DOT `digraph`.
#[derive(Debug, Clone)]
pub struct DotSerializer {
    graph_name: String,
}

impl DotSerializer {
    /// Create a serializer emitting `digraph dependencies`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_graph_name(DEFAULT_GRAPH_NAME)
    }

    /// Create a serializer emitting a graph with a custom name.
    #[must_use]
    pub fn with_graph_name(name: impl Into<String>) -> Self {
        Self {
            graph_name: name.into(),
        }
    }
}

impl Default for DotSerializer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Serializer for DotSerializer {
    async fn serialize(&self, edges: &[Edge], out: &mut (dyn AsyncWrite + Unpin + Send)) -> Result<()> {
        let graph = DependencyGraph::from_edges(edges);
        let mut writer = DotWriter::new(out);

        writer.begin_digraph(&self.graph_name).await?;
        for (number, package) in graph.numbered_packages() {
            writer.node(number, package.as_str()).await?;
        }
        for (from, to) in graph.numbered_edges() {
            writer.edge(from, to).await?;
        }
        writer.finish().await?;

        tracing::debug!(
            packages = graph.package_count(),
            edges = graph.edge_count(),
            statements = writer.statements(),
            "wrote DOT graph"
        );
        Ok(())
    }
}
