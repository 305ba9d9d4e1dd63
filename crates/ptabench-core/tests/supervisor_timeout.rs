//! Timeout and redirection behaviour of the process supervisor with real children.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use ptabench_core::{OutputSink, ProcessSupervisor, RunStatus, TimeoutBudget, TIMEOUT_NOTICE};
use tempfile::TempDir;

fn sh(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script.to_string()]
}

/// Test: a child that never exits is killed within [budget, budget + 1s)
#[tokio::test]
async fn test_timeout_kills_within_one_second_of_budget() {
    let start = Instant::now();
    let status = ProcessSupervisor::run(
        &sh("exec sleep 30"),
        Path::new("."),
        OutputSink::Inherit,
        TimeoutBudget::from_secs(2),
    )
    .await
    .expect("supervision failed");
    let elapsed = start.elapsed();

    assert_eq!(status, RunStatus::TimedOut);
    assert!(elapsed >= Duration::from_secs(2), "killed too early: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(3), "killed too late: {elapsed:?}");
}

/// Test: unlimited budget waits for natural exit
#[tokio::test]
async fn test_unlimited_budget_waits_for_exit() {
    let start = Instant::now();
    let status = ProcessSupervisor::run(
        &sh("sleep 1"),
        Path::new("."),
        OutputSink::Inherit,
        TimeoutBudget::from_secs(-1),
    )
    .await
    .expect("supervision failed");

    assert_eq!(status, RunStatus::Completed);
    assert!(start.elapsed() >= Duration::from_secs(1));
}

/// Test: fast child under a generous budget completes without waiting for the budget
#[tokio::test]
async fn test_fast_child_completes_early() {
    let start = Instant::now();
    let status = ProcessSupervisor::run(
        &sh("true"),
        Path::new("."),
        OutputSink::Inherit,
        TimeoutBudget::from_secs(60),
    )
    .await
    .expect("supervision failed");

    assert_eq!(status, RunStatus::Completed);
    assert!(start.elapsed() < Duration::from_secs(10));
}

/// Test: stdout lands in the file sink
#[tokio::test]
async fn test_stdout_is_redirected_to_sink() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("antlr_insens.o");
    let file = fs::File::create(&path).unwrap();

    let status = ProcessSupervisor::run(
        &sh("echo points-to results"),
        Path::new("."),
        OutputSink::File(file),
        TimeoutBudget::from_secs(10),
    )
    .await
    .unwrap();

    assert_eq!(status, RunStatus::Completed);
    assert_eq!(fs::read_to_string(&path).unwrap(), "points-to results\n");
}

/// Test: timed-out run keeps partial output followed by the timeout notice
#[tokio::test]
async fn test_timeout_notice_is_appended_to_artifact() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("eclipse_3o.o");
    let file = fs::File::create(&path).unwrap();

    let status = ProcessSupervisor::run(
        &sh("echo partial; exec sleep 30"),
        Path::new("."),
        OutputSink::File(file),
        TimeoutBudget::from_secs(1),
    )
    .await
    .unwrap();

    assert_eq!(status, RunStatus::TimedOut);
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, format!("partial\n{TIMEOUT_NOTICE}\n"));
}

/// Test: the child runs in the requested working directory
#[tokio::test]
async fn test_child_runs_in_engine_dir() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("marker.txt"), "engine home").unwrap();
    let out = dir.path().join("out.o");

    ProcessSupervisor::run(
        &sh("cat marker.txt"),
        dir.path(),
        OutputSink::File(fs::File::create(&out).unwrap()),
        TimeoutBudget::from_secs(10),
    )
    .await
    .unwrap();

    assert_eq!(fs::read_to_string(&out).unwrap(), "engine home");
}

/// Test: a timeout also kills processes the engine forked, so nothing writes after the notice
#[tokio::test]
async fn test_timeout_kills_forked_descendants() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bloat_2t.o");
    let file = fs::File::create(&path).unwrap();

    let status = ProcessSupervisor::run(
        &sh("(sleep 2; echo grandchild-still-writing); wait"),
        Path::new("."),
        OutputSink::File(file),
        TimeoutBudget::from_secs(1),
    )
    .await
    .unwrap();
    assert_eq!(status, RunStatus::TimedOut);

    // Outlive the subshell's sleep; a surviving grandchild would have written by now.
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        format!("{TIMEOUT_NOTICE}\n")
    );
}

/// Test: abandoning a supervised run mid-wait tears down the engine's process group
#[tokio::test]
async fn test_cancelled_run_kills_process_group() {
    let dir = TempDir::new().unwrap();

    let abandoned = tokio::time::timeout(
        Duration::from_secs(1),
        ProcessSupervisor::run(
            &sh("(sleep 2; echo leaked > leak.txt) & wait"),
            dir.path(),
            OutputSink::Inherit,
            TimeoutBudget::unlimited(),
        ),
    )
    .await;
    assert!(abandoned.is_err(), "run should still be waiting");

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(!dir.path().join("leak.txt").exists());
}
