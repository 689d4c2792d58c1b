#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinetui");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("browse"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("favorites"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("history"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_version() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinetui");
    cmd.arg("--version").assert().success();
}

#[test]
fn test_search_missing_query() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinetui");
    cmd.arg("search")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--query"));
}

#[test]
fn test_search_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinetui");
    cmd.args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--count"));
}

#[test]
fn test_favorites_add_missing_id() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinetui");
    cmd.args(["favorites", "add"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--id"));
}

#[test]
fn test_favorites_remove_missing_id() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinetui");
    cmd.args(["favorites", "remove"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--id"));
}

#[test]
fn test_favorites_list_rejects_unknown_sort() {
    // Arrange
    let tmp = tempfile::TempDir::new().unwrap();

    // Act & Assert: the sort criterion is validated before any request
    let mut cmd = cargo_bin_cmd!("cinetui");
    cmd.args(["favorites", "list", "--sort-by", "popularity", "--dir"])
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown sort criterion"));
}

#[test]
fn test_stats_fails_on_invalid_config() {
    // Arrange
    let tmp = tempfile::TempDir::new().unwrap();
    std::fs::write(tmp.path().join("config.toml"), "not = [valid").unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinetui");
    cmd.args(["stats", "--dir"])
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn test_invalid_base_url_rejected() {
    // Arrange
    let tmp = tempfile::TempDir::new().unwrap();

    // Act & Assert: URL parsing fails before any request
    let mut cmd = cargo_bin_cmd!("cinetui");
    cmd.args(["search", "--query", "盗梦空间", "--base-url", "::not-a-url::", "--dir"])
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid base URL"));
}

#[test]
fn test_history_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinetui");
    cmd.args(["history", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--limit"));
}

#[test]
fn test_completions_bash() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinetui");
    cmd.args(["completions", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cinetui"));
}
