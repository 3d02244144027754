//! A small async writer for Graphviz DOT graph descriptions.
//!
//! This library provides buffered, streaming output of directed graphs in
//! the DOT language, suitable for piping into `dot -Tsvg` and friends.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod escape;
pub mod writer;

pub use error::{Error, Result};
pub use escape::{escape_label, format_id};
pub use writer::DotWriter;
