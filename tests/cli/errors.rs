//! Tests for error reporting and exit codes.

use crate::support::*;

#[test]
fn test_missing_store_exits_2() {
    let t = Test::new();

    for args in [
        vec!["list-domains"],
        vec!["add-key-custodian"],
        vec!["set-secret", "--domain", "d", "--secret", "s", "--value", "v"],
    ] {
        let output = t.as_user(ALICE).args(&args).output().unwrap();
        assert_exit_code(&output, 2);
        assert_stderr_contains(&output, "file not found");
        assert_stderr_contains(&output, "pprotect init");
    }
    assert!(!t.path().exists());
}

#[test]
fn test_unknown_user_and_wrong_passphrase_look_the_same() {
    let t = Test::scenario();

    let unknown = t.decrypt(CAROL, "prod");
    let wrong = t.decrypt(("alice@example.com", "nope"), "prod");

    assert_exit_code(&unknown, 1);
    assert_exit_code(&wrong, 1);
    assert_eq!(stderr(&unknown), stderr(&wrong));
}

#[test]
fn test_malformed_store_reported() {
    let t = Test::new();
    std::fs::write(t.path(), "format_version: [\n").unwrap();

    let output = t.cmd().arg("list-domains").output().unwrap();
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "malformed key file");
}

#[test]
fn test_unsupported_version_reported() {
    let t = Test::new();
    std::fs::write(t.path(), "format_version: 9\n").unwrap();

    let output = t.cmd().arg("list-domains").output().unwrap();
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "unsupported key file format version 9");
}

#[test]
fn test_invalid_kdf_override_reported() {
    let t = Test::scenario();

    let output = t
        .cmd()
        .env("PPROTECT_KDF_ITERATIONS", "many")
        .arg("list-domains")
        .output()
        .unwrap();
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "invalid value for kdf iterations");
}
