//! depviz CLI binary.

use anyhow::Result;
use depviz::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the depviz CLI.
///
/// Uses the multi-threaded runtime: the discovery workers spend their time
/// waiting on the network and benefit from running in parallel.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Logs go to stderr so stdout stays clean for the graph.
    // Can be controlled via RUST_LOG environment variable
    // Example: RUST_LOG=depviz=debug cargo run -- -p fastapi
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("Starting depviz CLI");

    cli.execute().await?;

    tracing::debug!("depviz CLI completed successfully");
    Ok(())
}
