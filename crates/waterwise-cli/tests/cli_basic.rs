//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_waterwise"))
        .env("WATERWISE_DATA_DIR", data_dir)
        .env_remove("WATERWISE_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_reward_scenarios() {
    let dir = TempDir::new().unwrap();
    let cases = [
        ("80", "100", "0.2"),
        ("0", "100", "1"),
        ("150", "100", "0"),
        ("0", "0", "0"),
    ];
    for (actual, expected, want) in cases {
        let (stdout, stderr, code) =
            run_cli(dir.path(), &["reward", "--actual", actual, "--expected", expected]);
        assert_eq!(code, 0, "reward failed: {stderr}");
        assert_eq!(stdout.trim(), want);
    }
}

#[test]
fn test_analyze_records_and_rewards() {
    let dir = TempDir::new().unwrap();
    for (date, usage) in [("2024-06-01", "100"), ("2024-06-02", "200"), ("2024-06-03", "300")] {
        run_json(
            dir.path(),
            &["analyze", "--usage", usage, "--members", "2", "--date", date, "--json"],
        );
    }

    let baseline = run_json(dir.path(), &["baseline", "--json"]);
    assert_eq!(baseline["expected_usage"], 200.0);
    assert_eq!(baseline["samples"], 3);
    assert_eq!(baseline["strategy"], "rolling_mean");

    let analysis = run_json(
        dir.path(),
        &["analyze", "--usage", "180", "--members", "3", "--date", "2024-06-04", "--json"],
    );
    assert_eq!(analysis["record"]["expected_usage"], 200.0);
    assert_eq!(analysis["record"]["reward_score"], 0.2);
    assert_eq!(analysis["feedback"], "saviour");
    assert_eq!(analysis["per_person_usage"], 60.0);

    let history = run_json(dir.path(), &["history", "--json"]);
    assert_eq!(history.as_array().map(Vec::len), Some(4));

    let recent = run_json(dir.path(), &["history", "--limit", "1", "--json"]);
    assert_eq!(recent[0]["date"], "2024-06-04");

    let stats = run_json(dir.path(), &["stats"]);
    assert_eq!(stats["total_records"], 4);
    assert_eq!(stats["days_under_baseline"], 1);
}

#[test]
fn test_analyze_rejects_negative_usage() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["analyze", "--usage", "-5"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
    assert!(stderr.contains("actual_usage"), "stderr: {stderr}");

    let history = run_json(dir.path(), &["history", "--json"]);
    assert_eq!(history.as_array().map(Vec::len), Some(0));
}

#[test]
fn test_config_get_set_reset() {
    let dir = TempDir::new().unwrap();

    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "baseline.window"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "7");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "baseline.window", "3"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "baseline.window"]);
    assert_eq!(stdout.trim(), "3");

    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "baseline.window", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("baseline.window"), "stderr: {stderr}");

    let (_, _, code) = run_cli(dir.path(), &["config", "get", "baseline.nope"]);
    assert_eq!(code, 1);

    let listed = run_json(dir.path(), &["config", "list"]);
    assert_eq!(listed["baseline"]["window"], 3);

    let (_, _, code) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "baseline.window"]);
    assert_eq!(stdout.trim(), "7");
}

#[test]
fn test_fail_policy_on_empty_history() {
    let dir = TempDir::new().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "baseline.empty_history", "fail"]);
    assert_eq!(code, 0);

    let (_, stderr, code) = run_cli(dir.path(), &["baseline"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Insufficient data"), "stderr: {stderr}");
}
