//! Application context: discovery engine plus serializer.
//!
//! # Example
//!
//! ```no_run
//! use depviz::app::App;
//! use depviz::config::Config;
//! use depviz::output::{OutputConfig, OutputFormat};
//! use depviz::provider::Registry;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_config(
//!         Registry::Npm,
//!         OutputFormat::Json,
//!         &Config::default(),
//!         OutputConfig::plain(),
//!     )?;
//!     let mut stdout = tokio::io::stdout();
//!     app.run(&"express".into(), &CancellationToken::new(), &mut stdout)
//!         .await?;
//!     Ok(())
//! }
//! ```

use crate::config::Config;
use crate::discovery::GraphBuilder;
use crate::domain::{DependencyGraph, PackageId};
use crate::error::Result;
use crate::output::{OutputConfig, OutputFormat, Serializer, serializer_for};
use crate::provider::{Fetcher, Registry, create_fetcher};
use std::sync::Arc;
use tokio::io::AsyncWrite;
use tokio_util::sync::CancellationToken;

/// Counts reported after a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Distinct packages in the graph.
    pub packages: usize,
    /// Edges written, duplicates included.
    pub edges: usize,
}

/// Builds a dependency graph and writes it out.
pub struct App {
    builder: GraphBuilder,
    serializer: Box<dyn Serializer>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("builder", &self.builder)
            .field("serializer", &"<dyn Serializer>")
            .finish()
    }
}

impl App {
    /// Create an App from its parts.
    #[must_use]
    pub fn new(builder: GraphBuilder, serializer: Box<dyn Serializer>) -> Self {
        Self {
            builder,
            serializer,
        }
    }

    /// Create an App that queries `registry` and writes `format`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the registry client cannot be set up.
    pub fn from_config(
        registry: Registry,
        format: OutputFormat,
        config: &Config,
        output: OutputConfig,
    ) -> Result<Self> {
        let fetcher = create_fetcher(registry, config)?;
        Ok(Self::with_fetcher(fetcher, format, config, output))
    }

    /// Create an App around an existing fetcher.
    #[must_use]
    pub fn with_fetcher(
        fetcher: Arc<dyn Fetcher>,
        format: OutputFormat,
        config: &Config,
        output: OutputConfig,
    ) -> Self {
        let builder = GraphBuilder::new(fetcher).with_workers(config.concurrency);
        Self::new(builder, serializer_for(format, output))
    }

    /// Discover the graph of `package` and serialize it to `out`.
    ///
    /// Nothing is written unless discovery succeeds.
    ///
    /// # Errors
    ///
    /// Returns the discovery error (including `Error::Cancelled`) or the
    /// error from writing the output.
    pub async fn run(
        &self,
        package: &PackageId,
        cancel: &CancellationToken,
        out: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<RunSummary> {
        let edges = self.builder.build(package, cancel).await?;
        let graph = DependencyGraph::from_edges(&edges);
        let summary = RunSummary {
            packages: graph.package_count().max(1),
            edges: graph.edge_count(),
        };

        self.serializer.serialize(&edges, out).await?;
        tracing::info!(
            %package,
            packages = summary.packages,
            edges = summary.edges,
            "wrote dependency graph"
        );
        Ok(summary)
    }
}
