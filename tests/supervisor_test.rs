#![cfg(unix)]

use pagewatch::Supervisor;
use std::time::{Duration, Instant};
use tempfile::TempDir;

#[tokio::test]
async fn test_supervisor_restarts_crashing_child() {
    let temp_dir = TempDir::new().unwrap();
    let log = temp_dir.path().join("runs.log");

    let script = format!("echo run >> {}; exit 1", log.display());
    let handle = Supervisor::new("/bin/sh", vec!["-c".to_string(), script])
        .with_restart_delay(Duration::from_millis(50))
        .start();

    tokio::time::sleep(Duration::from_millis(800)).await;
    handle.shutdown().await;

    let runs = std::fs::read_to_string(&log).unwrap();
    assert!(
        runs.lines().count() >= 2,
        "child should have been restarted at least once, got: {:?}",
        runs
    );
}

#[tokio::test]
async fn test_supervisor_shutdown_is_bounded() {
    let handle = Supervisor::new("/bin/sh", vec!["-c".to_string(), "sleep 30".to_string()]).start();

    // give the child time to start before asking for termination
    tokio::time::sleep(Duration::from_millis(200)).await;

    let started = Instant::now();
    handle.shutdown().await;

    // SIGTERM should take the shell down well inside the kill escalation window
    assert!(started.elapsed() < Duration::from_secs(7));
}

#[tokio::test]
async fn test_supervisor_survives_missing_command() {
    let handle = Supervisor::new("/nonexistent/fetch-worker", vec![])
        .with_restart_delay(Duration::from_millis(50))
        .start();

    // spawn failures are retried, not fatal; shutdown must still work
    tokio::time::sleep(Duration::from_millis(200)).await;
    handle.shutdown().await;
}
