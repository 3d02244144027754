//! Dependency tree rendering for terminals.

use std::collections::HashSet;
use std::io::{self, Write};

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::color::{dimmed, root};
use super::{OutputConfig, Serializer};
use crate::domain::{DependencyGraph, Edge, PackageId};
use crate::error::Result;

/// Marker for a package whose dependencies were already printed above.
const REPEAT_MARKER: &str = "(*)";

/// Writes the edge list as an indented tree rooted at the first package.
///
/// Renders a tree like:
/// ```text
/// fastapi
/// ├── starlette
/// │   └── anyio
/// └── pydantic
///     └── starlette (*)
/// ```
///
/// A package with dependencies is expanded the first time it appears; later
/// appearances get a `(*)` marker instead, which also keeps cycles finite.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSerializer {
    config: OutputConfig,
}

impl TreeSerializer {
    /// Create a tree serializer with the given styling.
    #[must_use]
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Serializer for TreeSerializer {
    async fn serialize(&self, edges: &[Edge], out: &mut (dyn AsyncWrite + Unpin + Send)) -> Result<()> {
        let graph = DependencyGraph::from_edges(edges);
        let mut buffer = Vec::new();
        render_tree(&mut buffer, &graph, &self.config)?;
        out.write_all(&buffer).await?;
        out.flush().await?;
        Ok(())
    }
}

/// Render the whole tree. An empty graph renders nothing.
pub fn render_tree<W: Write>(
    w: &mut W,
    graph: &DependencyGraph,
    config: &OutputConfig,
) -> io::Result<()> {
    let Some(top) = graph.root() else {
        return Ok(());
    };
    writeln!(w, "{}", root(top.as_str(), config))?;

    let mut expanded = HashSet::from([top.as_str()]);
    render_children(w, graph, top, &mut expanded, config)
}

/// Render everything below `top` with connector lines.
///
/// Walks depth-first with an explicit stack of `(children, next)` frames, so
/// a long dependency chain costs heap rather than call stack.
/// `prefix_segments[i]` records whether level `i` still has siblings below,
/// which draws the vertical continuation lines (`│`).
fn render_children<'g, W: Write>(
    w: &mut W,
    graph: &'g DependencyGraph,
    top: &'g PackageId,
    expanded: &mut HashSet<&'g str>,
    config: &OutputConfig,
) -> io::Result<()> {
    let (branch, corner, pipe, space) = if config.use_ascii {
        ("|-- ", "`-- ", "|   ", "    ")
    } else {
        ("├── ", "└── ", "│   ", "    ")
    };

    let mut stack: Vec<(Vec<&'g PackageId>, usize)> =
        vec![(graph.dependencies_of(top.as_str()), 0)];
    let mut prefix_segments: Vec<bool> = Vec::new();

    while let Some((children, next)) = stack.last_mut() {
        let Some(&child) = children.get(*next) else {
            stack.pop();
            prefix_segments.pop();
            continue;
        };
        *next += 1;
        let is_last = *next == children.len();

        let mut prefix = String::new();
        for &has_more in &prefix_segments {
            prefix.push_str(&dimmed(if has_more { pipe } else { space }, config));
        }
        let connector = dimmed(if is_last { corner } else { branch }, config);

        let grandchildren = graph.dependencies_of(child.as_str());
        let has_children = !grandchildren.is_empty();
        let first_visit = has_children && expanded.insert(child.as_str());
        let marker = if has_children && !first_visit {
            format!(" {}", dimmed(REPEAT_MARKER, config))
        } else {
            String::new()
        };

        writeln!(w, "{prefix}{connector}{child}{marker}")?;

        if first_visit {
            prefix_segments.push(!is_last);
            stack.push((grandchildren, 0));
        }
    }

    Ok(())
}
