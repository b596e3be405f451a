//! CLI tests that run without network access.
//!
//! Each test points the binary at its own config file so nothing from the
//! developer's environment leaks in.

use std::path::Path;
use std::process::{Command, Output};

/// Run the CLI binary with an isolated config file.
fn run_cli(args: &[&str], config: &Path) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_hepan"));
    cmd.args(args);
    cmd.env("HEPAN_CONFIG", config);
    cmd.env_remove("HEPAN_USERNAME");
    cmd.env_remove("HEPAN_PASSWORD");
    cmd.env_remove("HEPAN_FORUM");
    cmd.output().expect("Failed to execute CLI")
}

fn config_file(dir: &tempfile::TempDir, text: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, text).unwrap();
    path
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_file(&dir, "");

    let output = run_cli(&["--help"], &config);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["login", "replies", "rate", "rank", "task", "reward", "keepalive"] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
}

#[test]
fn test_unknown_rank_view_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_file(&dir, "");

    let output = run_cli(&["rank", "user", "bogus"], &config);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("bogus"));
}

#[test]
fn test_reward_over_daily_cap_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_file(&dir, "[accounts]\nrange6 = \"secret\"\n");

    let output = run_cli(
        &["reward", "2287221", "--score", "10", "--max-total", "41"],
        &config,
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("daily rating cap"));
}

#[test]
fn test_missing_account_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_file(&dir, "");

    let output = run_cli(&["login"], &config);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("No account configured"));
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_file(&dir, "[client\n");

    let output = run_cli(&["login"], &config);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid config file"));
}

#[test]
fn test_insecure_forum_url_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_file(&dir, "[accounts]\nrange6 = \"secret\"\n");

    let output = run_cli(&["--forum", "http://bbs.example.com", "login"], &config);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid forum URL"));
}
