//! CLI argument parsing and execution.
//!
//! # Example
//!
//! ```bash
//! depviz -p fastapi > fastapi.dot
//! depviz -p @vue/compiler-dom -r npm -f tree
//! depviz -p requests -f json -o requests.json --timeout 60 -c 32
//! ```
//!
//! Flags override values from `--config`; the configuration file in turn
//! overrides the built-in defaults.

mod execute;
mod validators;

pub use validators::{validate_concurrency, validate_package_name, validate_timeout};

use crate::config::Config;
use crate::output::OutputFormat;
use crate::provider::Registry;
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// depviz - Visualize the dependency graph of a package
///
/// Walks a package's dependencies through its registry (PyPI or npm),
/// concurrently, and prints the graph as Graphviz DOT, JSON or a tree.
#[derive(Parser, Debug)]
#[command(name = "depviz")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root package whose dependency graph to build
    #[arg(short, long, value_parser = validate_package_name)]
    pub package: String,

    /// Registry to query
    #[arg(short, long, value_enum, default_value_t = Registry::Pip)]
    pub registry: Registry,

    /// Write the graph to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Dot)]
    pub format: OutputFormat,

    /// Number of concurrent registry lookups [default: 256]
    #[arg(short, long, value_name = "N", value_parser = validate_concurrency)]
    pub concurrency: Option<usize>,

    /// Abort if the graph is not complete after this many seconds
    #[arg(long, value_name = "SECS", value_parser = validate_timeout)]
    pub timeout: Option<u64>,

    /// YAML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse CLI arguments from command line
    #[must_use]
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid or missing arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Log filter used when `RUST_LOG` is not set.
    #[must_use]
    pub fn default_log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "depviz=warn,depviz_dot=warn",
            1 => "depviz=info,depviz_dot=info",
            _ => "depviz=debug,depviz_dot=debug",
        }
    }

    /// Load the configuration file (if any) and apply flag overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// merged configuration is invalid.
    pub async fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .await
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = Some(timeout);
        }

        config.validate()?;
        Ok(config)
    }

    /// Build the graph and write it out.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery fails, is interrupted or times out, or
    /// if the output cannot be written.
    pub async fn execute(&self) -> Result<()> {
        let config = self.resolve_config().await?;
        execute::execute(self, &config).await
    }
}
