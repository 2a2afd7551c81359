//! Operator CLI tests against a scratch database.

use assert_cmd::Command;
use predicates::prelude::*;

fn write_config(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let db = dir.path().join("watch.db");
    let media = dir.path().join("media");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        format!(
            "database = \"{}\"\nmedia_dir = \"{}\"\n",
            db.display(),
            media.display()
        ),
    )
    .unwrap();
    path
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("thriftwatch")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("category"))
        .stdout(predicate::str::contains("subscribe"));
}

#[test]
fn check_config_accepts_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir);

    Command::cargo_bin("thriftwatch")
        .unwrap()
        .args(["check", "config", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("configuration file is valid"));
}

#[test]
fn check_config_rejects_missing_file() {
    Command::cargo_bin("thriftwatch")
        .unwrap()
        .args(["check", "config", "--config", "/nonexistent/config.toml"])
        .assert()
        .failure();
}

#[test]
fn category_add_then_list() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir);

    Command::cargo_bin("thriftwatch")
        .unwrap()
        .args(["category", "add", "nike kurtki", "--brand-id", "53", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("tracked"));

    Command::cargo_bin("thriftwatch")
        .unwrap()
        .args(["category", "list", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("nike kurtki"))
        .stdout(predicate::str::contains("53"));
}

#[test]
fn subscribe_then_unsubscribe_removes_orphaned_category() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir);

    Command::cargo_bin("thriftwatch")
        .unwrap()
        .args(["user", "add", "7", "--username", "anna", "--config"])
        .arg(&config)
        .assert()
        .success();

    Command::cargo_bin("thriftwatch")
        .unwrap()
        .args(["category", "add", "polo", "--config"])
        .arg(&config)
        .assert()
        .success();

    Command::cargo_bin("thriftwatch")
        .unwrap()
        .args(["subscribe", "7", "1", "--config"])
        .arg(&config)
        .assert()
        .success();

    Command::cargo_bin("thriftwatch")
        .unwrap()
        .args(["unsubscribe", "7", "1", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("no subscribers left"));

    Command::cargo_bin("thriftwatch")
        .unwrap()
        .args(["category", "list", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("No categories tracked"));
}
