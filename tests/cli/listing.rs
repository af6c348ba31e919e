//! Tests for the read-only listing commands.

use crate::support::*;

fn two_domains() -> Test {
    let t = Test::scenario();
    assert_success(&t.add_domain(BOB, "staging"));
    assert_success(&t.set_secret("staging", "db_pass", "x"));
    assert_success(&t.set_secret("staging", "api_key", "y"));
    t
}

#[test]
fn test_list_domains() {
    let t = two_domains();

    let output = t.cmd().arg("list-domains").output().unwrap();
    assert_success(&output);
    assert_eq!(
        stdout(&output),
        "prod: alice@example.com\nstaging: bob@example.com\n"
    );
}

#[test]
fn test_list_domains_empty() {
    let t = Test::init(ALICE);

    let output = t.cmd().arg("list-domains").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "no domains");
}

#[test]
fn test_list_all_secrets() {
    let t = two_domains();

    let output = t.cmd().arg("list-all-secrets").output().unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output), "api_key: staging\ndb_pass: prod, staging\n");
}

#[test]
fn test_list_user_secrets() {
    let t = two_domains();

    let output = t
        .cmd()
        .args(["list-user-secrets", "-u", "bob@example.com"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output), "staging: api_key, db_pass\n");
}

#[test]
fn test_list_user_secrets_unknown_user() {
    let t = two_domains();

    let output = t
        .cmd()
        .args(["list-user-secrets", "-u", "carol@example.com"])
        .output()
        .unwrap();
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "unknown key custodian");
}
