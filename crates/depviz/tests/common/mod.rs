//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use depviz::domain::{Edge, PackageId};
use depviz::provider::{FetchError, Fetcher};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// How the scripted registry answers for one package.
#[derive(Debug, Clone)]
pub enum Script {
    /// Return these dependencies.
    Deps(Vec<String>),
    /// Answer 404.
    NotFound,
    /// Never answer; give up when the token fires.
    Hang,
    /// Never answer, not even on cancellation.
    HangIgnoringCancel,
    /// Report a cancellation nobody asked for.
    Cancelled,
}

/// In-memory registry that records how it is called.
///
/// Packages without a script are leaves.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    scripts: HashMap<String, Script>,
    delay: Option<Duration>,
    calls: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(package, deps)` pairs.
    pub fn from_graph(graph: &[(&str, &[&str])]) -> Self {
        graph
            .iter()
            .fold(Self::new(), |fetcher, (name, deps)| fetcher.with_deps(*name, deps.iter().copied()))
    }

    pub fn with_deps<S: Into<String>>(
        mut self,
        package: impl Into<String>,
        deps: impl IntoIterator<Item = S>,
    ) -> Self {
        let deps = deps.into_iter().map(Into::into).collect();
        self.scripts.insert(package.into(), Script::Deps(deps));
        self
    }

    pub fn with_script(mut self, package: impl Into<String>, script: Script) -> Self {
        self.scripts.insert(package.into(), script);
        self
    }

    /// Delay every answer, to force fetches to overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Times `package` was fetched.
    pub fn calls_for(&self, package: &str) -> usize {
        self.calls.lock().unwrap().get(package).copied().unwrap_or(0)
    }

    /// Total fetches across all packages.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    /// Packages fetched more than once.
    pub fn refetched(&self) -> Vec<String> {
        let mut refetched: Vec<String> = self
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|&(_, &n)| n > 1)
            .map(|(p, _)| p.clone())
            .collect();
        refetched.sort();
        refetched
    }

    /// Fetches currently running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of fetches that ever ran at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Wait until at least `n` fetches have started.
    pub async fn wait_for_calls(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.total_calls() < n {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("fetches did not start in time");
    }
}

/// Tracks one running fetch; released when the fetch future is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize, max: &AtomicUsize) -> Self {
        let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
        max.fetch_max(now, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch_dependencies(
        &self,
        package: &PackageId,
        cancel: &CancellationToken,
    ) -> Result<Vec<PackageId>, FetchError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(package.to_string())
            .or_default() += 1;
        let _guard = InFlight::enter(&self.in_flight, &self.max_in_flight);

        if let Some(delay) = self.delay {
            tokio::select! {
                () = cancel.cancelled() => return Err(FetchError::Cancelled),
                () = tokio::time::sleep(delay) => {}
            }
        }

        match self.scripts.get(package.as_str()) {
            None => Ok(Vec::new()),
            Some(Script::Deps(deps)) => Ok(deps.iter().map(PackageId::new).collect()),
            Some(Script::NotFound) => Err(FetchError::NotFound {
                package: package.clone(),
            }),
            Some(Script::Hang) => {
                cancel.cancelled().await;
                Err(FetchError::Cancelled)
            }
            Some(Script::HangIgnoringCancel) => std::future::pending().await,
            Some(Script::Cancelled) => Err(FetchError::Cancelled),
        }
    }
}

/// Edges rendered as sorted `"a -> b"` strings, for order-free comparison.
pub fn sorted_edges(edges: &[Edge]) -> Vec<String> {
    let mut edges: Vec<String> = edges.iter().map(ToString::to_string).collect();
    edges.sort();
    edges
}

/// Expected edges as sorted strings.
pub fn expected_edges(edges: &[(&str, &str)]) -> Vec<String> {
    let mut edges: Vec<String> = edges.iter().map(|(a, b)| format!("{a} -> {b}")).collect();
    edges.sort();
    edges
}

/// Path of the depviz binary built for these tests.
pub fn depviz_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_depviz"))
}
