//! depviz - Concurrent package dependency graph discovery.
//!
//! Given a root package and a registry, depviz fetches the package's direct
//! dependencies, then theirs, and so on, with a bounded pool of concurrent
//! workers. Each reachable package is fetched once. The resulting edge list
//! is rendered as Graphviz DOT, JSON or a tree.
//!
//! # Example
//!
//! ```no_run
//! use depviz::config::Config;
//! use depviz::discovery::GraphBuilder;
//! use depviz::provider::{Registry, create_fetcher};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let fetcher = create_fetcher(Registry::Pip, &Config::default())?;
//!     let edges = GraphBuilder::new(fetcher)
//!         .with_workers(64)
//!         .build(&"fastapi".into(), &CancellationToken::new())
//!         .await?;
//!     for edge in &edges {
//!         println!("{edge}");
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod config;
pub mod discovery;
pub mod domain;
pub mod error;
pub mod output;
pub mod provider;

// Application layer (needed by binary)
pub mod app;
pub mod cli;

pub use discovery::GraphBuilder;
pub use domain::{DependencyGraph, Edge, PackageId};
pub use error::{Error, Result};
