//! Tests for answers piped on stdin instead of flags and environment.

use crate::support::*;

#[test]
fn test_init_from_piped_answers() {
    let t = Test::new();

    let output = t
        .cmd()
        .arg("init")
        .write_stdin("alice@example.com\npw1\npw1\n")
        .output()
        .unwrap();

    assert_success(&output);
    assert_success(&t.add_domain(ALICE, "prod"));
    assert_success(&t.set_secret("prod", "k", "v"));
    assert_eq!(decrypted(&t.decrypt(ALICE, "prod"))["k"], "v");
}

#[test]
fn test_piped_passphrase_mismatch() {
    let t = Test::new();

    let output = t
        .cmd()
        .arg("init")
        .write_stdin("alice@example.com\npw1\npw2\n")
        .output()
        .unwrap();

    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "passphrases did not match");
    assert!(!t.path().exists());
}

#[test]
fn test_set_secret_prompts_in_order() {
    let t = Test::scenario();

    let output = t
        .cmd()
        .arg("set-secret")
        .write_stdin("prod\nfrom_stdin\nvalue with spaces\n")
        .output()
        .unwrap();

    assert_success(&output);
    assert_eq!(
        decrypted(&t.decrypt(ALICE, "prod"))["from_stdin"],
        "value with spaces"
    );
}

#[test]
fn test_decrypt_with_piped_credentials() {
    let t = Test::scenario();

    let output = t
        .cmd()
        .args(["decrypt-domain", "--domain", "prod"])
        .write_stdin("alice@example.com\npw1\n")
        .output()
        .unwrap();

    assert_eq!(decrypted(&output)["db_pass"], "s3cr3t");
}

#[test]
fn test_closed_stdin_fails_cleanly() {
    let t = Test::scenario();

    let output = t
        .cmd()
        .args(["decrypt-domain", "--domain", "prod"])
        .write_stdin("")
        .output()
        .unwrap();

    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "no input for user email");
}
