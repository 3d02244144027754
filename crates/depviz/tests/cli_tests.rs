//! Integration tests for the depviz CLI.
//!
//! These tests run the built binary against a local mock registry.

use httpmock::prelude::*;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{Duration, Instant};
use tempfile::TempDir;

mod common;
use common::depviz_binary;

// ============================================================================
// Test Fixtures
// ============================================================================

/// Provides a fresh temporary directory for each test
#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Serve a small PyPI mirror under `/pypi`:
/// fastapi -> starlette, pydantic; starlette -> anyio.
fn pypi_mirror() -> MockServer {
    let server = MockServer::start();
    for (package, requires) in [
        ("fastapi", json!(["starlette>=0.40", "pydantic>=1.7.4", "httpx; extra == \"all\""])),
        ("starlette", json!(["anyio<5,>=3.4.0"])),
        ("pydantic", json!(null)),
        ("anyio", json!([])),
    ] {
        server.mock(|when, then| {
            when.method(GET).path(format!("/pypi/{package}/json"));
            then.status(200)
                .json_body(json!({"info": {"name": package, "requires_dist": requires}}));
        });
    }
    server.mock(|when, then| {
        when.method(GET).path("/pypi/ghost/json");
        then.status(404);
    });
    server
}

/// Write a config file pointing the pip registry at `server`.
fn write_config(dir: &Path, server: &MockServer, extra: &str) -> PathBuf {
    let path = dir.join("depviz.yaml");
    let yaml = format!("registries:\n  pip: {}\n{extra}", server.url("/pypi"));
    std::fs::write(&path, yaml).expect("Failed to write config");
    path
}

fn run_depviz(args: &[&str]) -> Output {
    Command::new(depviz_binary())
        .args(args)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute depviz binary")
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_cli_help() {
    let output = run_depviz(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("--package"));
    assert!(stdout.contains("--registry"));
    assert!(stdout.contains("--format"));
}

#[test]
fn test_cli_version() {
    let output = run_depviz(&["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[rstest]
#[case::missing_package(&[])]
#[case::blank_package(&["-p", " "])]
#[case::bad_registry(&["-p", "x", "-r", "maven"])]
#[case::bad_concurrency(&["-p", "x", "-c", "0"])]
fn test_cli_rejects_bad_arguments(#[case] args: &[&str]) {
    let output = run_depviz(args);

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
}

// ============================================================================
// End-to-end
// ============================================================================

#[rstest]
fn test_dot_output_to_file(temp_dir: TempDir) {
    let server = pypi_mirror();
    let config = write_config(temp_dir.path(), &server, "");
    let out = temp_dir.path().join("fastapi.dot");

    // One worker makes discovery order, and therefore numbering, fixed.
    let output = run_depviz(&[
        "-p",
        "fastapi",
        "-c",
        "1",
        "--config",
        &path_arg(&config),
        "-o",
        &path_arg(&out),
    ]);

    assert!(
        output.status.success(),
        "depviz failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(output.stdout.is_empty());
    let dot = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        dot,
        "digraph dependencies {
\t1 [label=\"fastapi\"];
\t2 [label=\"starlette\"];
\t3 [label=\"pydantic\"];
\t4 [label=\"anyio\"];
\t1 -> 2;
\t1 -> 3;
\t2 -> 4;
}
"
    );
}

#[rstest]
fn test_json_output_to_stdout(temp_dir: TempDir) {
    let server = pypi_mirror();
    let config = write_config(temp_dir.path(), &server, "concurrency: 16\n");

    let output = run_depviz(&["-p", "fastapi", "-f", "json", "--config", &path_arg(&config)]);

    assert!(output.status.success());
    let parsed: Value = serde_json::from_slice(&output.stdout).unwrap();
    let mut edges: Vec<(String, String)> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["from"].as_str().unwrap().to_string(),
                e["to"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    edges.sort();
    assert_eq!(
        edges,
        vec![
            ("fastapi".to_string(), "pydantic".to_string()),
            ("fastapi".to_string(), "starlette".to_string()),
            ("starlette".to_string(), "anyio".to_string()),
        ]
    );
}

#[rstest]
fn test_tree_output(temp_dir: TempDir) {
    let server = pypi_mirror();
    let config = write_config(temp_dir.path(), &server, "");

    let output = Command::new(depviz_binary())
        .args(["-p", "fastapi", "-f", "tree", "-c", "1", "--config", path_arg(&config).as_str()])
        .env("DEPVIZ_ASCII", "1")
        .env("NO_COLOR", "1")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "fastapi\n|-- starlette\n|   `-- anyio\n`-- pydantic\n"
    );
}

#[rstest]
fn test_missing_package_fails(temp_dir: TempDir) {
    let server = pypi_mirror();
    let config = write_config(temp_dir.path(), &server, "");

    let output = run_depviz(&["-p", "ghost", "--config", &path_arg(&config)]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Package not found: ghost"), "stderr: {stderr}");
}

#[rstest]
fn test_failed_run_keeps_existing_output_file(temp_dir: TempDir) {
    let server = pypi_mirror();
    let config = write_config(temp_dir.path(), &server, "");
    let out = temp_dir.path().join("graph.dot");
    std::fs::write(&out, "digraph previous {}\n").unwrap();

    let output = run_depviz(&[
        "-p",
        "ghost",
        "-o",
        &path_arg(&out),
        "--config",
        &path_arg(&config),
    ]);

    assert!(!output.status.success());
    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "digraph previous {}\n"
    );
    let mut names: Vec<String> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["depviz.yaml", "graph.dot"]);
}

#[rstest]
fn test_timeout_stops_discovery(temp_dir: TempDir) {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/pypi/slow/json");
        then.status(200)
            .delay(Duration::from_secs(60))
            .json_body(json!({"info": {"requires_dist": null}}));
    });
    let config = write_config(temp_dir.path(), &server, "");

    let started = Instant::now();
    let output = run_depviz(&["-p", "slow", "--timeout", "1", "--config", &path_arg(&config)]);

    assert!(!output.status.success());
    assert!(started.elapsed() < Duration::from_secs(30));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Timed out after 1s"), "stderr: {stderr}");
}

#[rstest]
fn test_invalid_config_fails(temp_dir: TempDir) {
    let config = temp_dir.path().join("depviz.yaml");
    std::fs::write(&config, "workers: 12\n").unwrap();

    let output = run_depviz(&["-p", "fastapi", "--config", &path_arg(&config)]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"), "stderr: {stderr}");
}
