//! DOT writing operations.
//!
//! This module provides async functionality for writing a directed graph in
//! the DOT language, one statement per line, with efficient buffering.

use std::fmt::Display;

use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use crate::escape::{escape_label, format_id};
use crate::{Error, Result};

/// Where the writer is within the `digraph { ... }` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing written yet.
    Start,
    /// Header written, statements may follow.
    Body,
    /// Closing brace written.
    Finished,
}

/// Async writer for DOT directed graphs.
///
/// `DotWriter` wraps an async writer and emits a `digraph` block statement
/// by statement: the header, then node and edge statements (each indented by
/// a tab), then the closing brace. Statements written out of order are
/// rejected with [`Error::InvalidState`].
///
/// # Type Parameters
///
/// * `W` - The underlying async writer type. Must implement [`AsyncWrite`] and [`Unpin`].
///
/// # Examples
///
/// ```no_run
/// use depviz_dot::DotWriter;
///
/// # async fn example() -> depviz_dot::Result<()> {
/// let mut writer = DotWriter::new(tokio::io::stdout());
/// writer.begin_digraph("dependencies").await?;
/// writer.node(1, "fastapi").await?;
/// writer.node(2, "starlette").await?;
/// writer.edge(1, 2).await?;
/// writer.finish().await?;
/// # Ok(())
/// # }
/// ```
pub struct DotWriter<W> {
    /// Buffered writer wrapping the underlying async writer.
    writer: BufWriter<W>,
    state: State,
    /// Number of statements written inside the graph body.
    statements: usize,
}

impl<W: AsyncWrite + Unpin> DotWriter<W> {
    /// Creates a new `DotWriter` wrapping the given async writer.
    ///
    /// The writer is wrapped in a [`BufWriter`] so that the many short
    /// statement lines do not each turn into a system call.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            state: State::Start,
            statements: 0,
        }
    }

    /// Writes the `digraph <name> {` header.
    ///
    /// The name is quoted if it is not a bare DOT identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the header was already written, or
    /// an IO error from the underlying writer.
    pub async fn begin_digraph(&mut self, name: &str) -> Result<()> {
        if self.state != State::Start {
            return Err(Error::InvalidState(
                "graph header already written".to_string(),
            ));
        }
        let line = format!("digraph {} {{\n", format_id(name));
        self.writer.write_all(line.as_bytes()).await?;
        self.state = State::Body;
        Ok(())
    }

    /// Writes a node statement `\t<id> [label="<label>"];`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] outside of the graph body, or an IO
    /// error from the underlying writer.
    pub async fn node(&mut self, id: impl Display, label: &str) -> Result<()> {
        self.ensure_body("node")?;
        let line = format!(
            "\t{} [label=\"{}\"];\n",
            format_id(&id.to_string()),
            escape_label(label)
        );
        self.write_statement(&line).await
    }

    /// Writes an edge statement `\t<from> -> <to>;`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] outside of the graph body, or an IO
    /// error from the underlying writer.
    pub async fn edge(&mut self, from: impl Display, to: impl Display) -> Result<()> {
        self.ensure_body("edge")?;
        let line = format!(
            "\t{} -> {};\n",
            format_id(&from.to_string()),
            format_id(&to.to_string())
        );
        self.write_statement(&line).await
    }

    /// Writes the closing brace and flushes the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the header was never written or the
    /// graph is already finished, or an IO error from the underlying writer.
    pub async fn finish(&mut self) -> Result<()> {
        self.ensure_body("closing brace")?;
        self.writer.write_all(b"}\n").await?;
        self.writer.flush().await?;
        self.state = State::Finished;
        tracing::trace!(statements = self.statements, "finished DOT graph");
        Ok(())
    }

    /// Returns the number of node and edge statements written so far.
    #[must_use]
    pub fn statements(&self) -> usize {
        self.statements
    }

    fn ensure_body(&self, what: &str) -> Result<()> {
        match self.state {
            State::Body => Ok(()),
            State::Start => Err(Error::InvalidState(format!(
                "{what} written before graph header"
            ))),
            State::Finished => Err(Error::InvalidState(format!(
                "{what} written after graph was finished"
            ))),
        }
    }

    async fn write_statement(&mut self, line: &str) -> Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.statements += 1;
        Ok(())
    }
}
