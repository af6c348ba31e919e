//! Tests for `pprotect init` and `pprotect version`.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_init_creates_store_with_first_custodian() {
    let t = Test::new();

    let output = t.init_cmd(ALICE);
    assert_success(&output);
    assert_stdout_contains(&output, "initialized");

    let contents = t.contents();
    assert!(contents.starts_with("format_version: 1\n"));
    assert!(contents.contains("alice@example.com"));
    assert!(!contents.contains("AGE-SECRET-KEY"));

    let kf = t.keyfile();
    assert_eq!(kf.custodian_ids(), vec!["alice@example.com"]);
    assert_eq!(kf.audit_log().len(), 1);
}

#[test]
fn test_init_twice_exits_2() {
    let t = Test::init(ALICE);
    let before = t.contents();

    let output = t.init_cmd(BOB);
    assert_exit_code(&output, 2);
    assert_stderr_contains(&output, "already exists");
    assert_eq!(t.contents(), before);
}

#[test]
fn test_init_honors_file_flag() {
    let t = Test::new();

    t.as_user(ALICE)
        .args(["--file", "team.yaml", "init"])
        .assert()
        .success();

    assert!(t.dir.path().join("team.yaml").exists());
    assert!(!t.path().exists());
}

#[test]
fn test_init_honors_file_env() {
    let t = Test::new();

    t.as_user(ALICE)
        .env("PPROTECT_FILE", "other.yaml")
        .arg("init")
        .assert()
        .success();

    assert!(t.dir.path().join("other.yaml").exists());
}

#[test]
fn test_version_needs_no_store() {
    let t = Test::new();

    t.cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("pocket_protector version "));
}

#[test]
fn test_completions() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pprotect"));
}
