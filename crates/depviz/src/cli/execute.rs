//! Running a parsed command line.

use super::Cli;
use crate::app::App;
use crate::config::Config;
use crate::domain::PackageId;
use crate::output::{OutputConfig, OutputFormat};
use anyhow::{Context, Result, bail};
use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWrite;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

type Sink = Box<dyn AsyncWrite + Unpin + Send>;

/// Why the traversal was cancelled from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    Interrupted,
    TimedOut(Duration),
}

pub(super) async fn execute(cli: &Cli, config: &Config) -> Result<()> {
    let app = App::from_config(
        cli.registry,
        cli.format,
        config,
        output_config(cli),
    )?;
    let package = PackageId::new(cli.package.as_str());

    // Opened up front so a bad path fails before a long traversal.
    let (mut sink, staged) = match &cli.output {
        Some(path) => {
            let (staged, file) = StagedFile::create(path).await?;
            (Box::new(file) as Sink, Some(staged))
        }
        None => (Box::new(tokio::io::stdout()) as Sink, None),
    };

    let cancel = CancellationToken::new();
    let stopper = spawn_stopper(cancel.clone(), config.timeout());

    let result = app.run(&package, &cancel, &mut *sink).await;
    drop(sink);

    // Releases the stopper if nothing fired it.
    cancel.cancel();
    let stop_reason = stopper.await.ok().flatten();

    match result {
        Ok(summary) => {
            if let Some(staged) = staged {
                staged.commit().await?;
            }
            tracing::debug!(?summary, "done");
            Ok(())
        }
        Err(e) => {
            if let Some(staged) = staged {
                staged.discard().await;
            }
            if !e.is_cancelled() {
                return Err(e.into());
            }
            match stop_reason {
                Some(StopReason::TimedOut(limit)) => bail!(
                    "Timed out after {}s while resolving dependencies of '{package}'",
                    limit.as_secs()
                ),
                _ => bail!("Interrupted while resolving dependencies of '{package}'"),
            }
        }
    }
}

/// An output file written through a temporary sibling.
///
/// The destination is only replaced by [`StagedFile::commit`], so a failed
/// or interrupted run leaves an existing file untouched.
#[derive(Debug)]
struct StagedFile {
    temp: PathBuf,
    dest: PathBuf,
}

impl StagedFile {
    async fn create(dest: &Path) -> Result<(Self, tokio::fs::File)> {
        let Some(name) = dest.file_name() else {
            bail!("Output path {} does not name a file", dest.display());
        };
        let mut temp_name = OsString::from(".");
        temp_name.push(name);
        temp_name.push(".tmp");
        let temp = dest.with_file_name(temp_name);

        let file = tokio::fs::File::create(&temp)
            .await
            .with_context(|| format!("Failed to create output file {}", dest.display()))?;
        Ok((
            Self {
                temp,
                dest: dest.to_path_buf(),
            },
            file,
        ))
    }

    async fn commit(self) -> Result<()> {
        tokio::fs::rename(&self.temp, &self.dest)
            .await
            .with_context(|| format!("Failed to write output file {}", self.dest.display()))
    }

    async fn discard(self) {
        if let Err(e) = tokio::fs::remove_file(&self.temp).await {
            tracing::warn!(path = %self.temp.display(), error = %e, "failed to remove partial output");
        }
    }
}

/// Colors only make sense for the tree on an interactive stdout.
fn output_config(cli: &Cli) -> OutputConfig {
    let mut config = OutputConfig::from_env();
    if cli.format != OutputFormat::Tree {
        return config;
    }
    if cli.output.is_some() || !std::io::stdout().is_terminal() {
        config.use_colors = false;
    }
    config
}

/// Cancel `cancel` on Ctrl-C or once `timeout` elapses.
///
/// The task ends as soon as `cancel` fires, whoever fired it, and reports
/// whether it was the one that did.
fn spawn_stopper(
    cancel: CancellationToken,
    timeout: Option<Duration>,
) -> JoinHandle<Option<StopReason>> {
    tokio::spawn(async move {
        let reason = tokio::select! {
            () = cancel.cancelled() => return None,
            Ok(()) = tokio::signal::ctrl_c() => StopReason::Interrupted,
            () = deadline(timeout) => match timeout {
                Some(limit) => StopReason::TimedOut(limit),
                None => return None,
            },
        };
        tracing::info!(?reason, "stopping dependency discovery");
        cancel.cancel();
        Some(reason)
    })
}

async fn deadline(timeout: Option<Duration>) {
    match timeout {
        Some(limit) => tokio::time::sleep(limit).await,
        None => std::future::pending().await,
    }
}
