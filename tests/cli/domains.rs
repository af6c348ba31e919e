//! Tests for domain, secret and owner commands.

use crate::support::*;

#[test]
fn test_full_scenario() {
    let t = Test::scenario();

    let values = decrypted(&t.decrypt(ALICE, "prod"));
    assert_eq!(values.len(), 1);
    assert_eq!(values["db_pass"], "s3cr3t");

    let output = t.decrypt(BOB, "prod");
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "not an owner");

    assert_success(&t.add_owner(ALICE, "prod", "bob@example.com"));
    assert_eq!(decrypted(&t.decrypt(BOB, "prod"))["db_pass"], "s3cr3t");

    let before = t.keyfile();
    assert_success(&t.rotate_domain(BOB, "prod"));
    let after = t.keyfile();
    assert_ne!(
        before.domain("prod").unwrap().public_key(),
        after.domain("prod").unwrap().public_key()
    );

    for user in [ALICE, BOB] {
        assert_eq!(decrypted(&t.decrypt(user, "prod"))["db_pass"], "s3cr3t");
    }
}

#[test]
fn test_decrypt_prints_sorted_pretty_json() {
    let t = Test::scenario();
    assert_success(&t.set_secret("prod", "api_key", "k-1"));

    let output = t.decrypt(ALICE, "prod");
    assert_success(&output);
    assert_eq!(
        stdout(&output),
        "{\n  \"api_key\": \"k-1\",\n  \"db_pass\": \"s3cr3t\"\n}\n"
    );
}

#[test]
fn test_set_secret_overwrites() {
    let t = Test::scenario();

    assert_success(&t.set_secret("prod", "db_pass", "changed"));
    assert_eq!(decrypted(&t.decrypt(ALICE, "prod"))["db_pass"], "changed");
}

#[test]
fn test_set_secret_unknown_domain() {
    let t = Test::scenario();

    let output = t.set_secret("nope", "a", "b");
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "domain not found");
}

#[test]
fn test_add_domain_wrong_passphrase() {
    let t = Test::init(ALICE);

    let output = t.add_domain(("alice@example.com", "wrong"), "prod");
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "Invalid user credentials");
    assert!(t.keyfile().domain("prod").is_none());
}

#[test]
fn test_add_duplicate_domain() {
    let t = Test::scenario();

    let output = t.add_domain(BOB, "prod");
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "domain already exists");
}

#[test]
fn test_add_owner_errors() {
    let t = Test::scenario();

    let output = t.add_owner(ALICE, "prod", "carol@example.com");
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "unknown key custodian");

    let output = t.add_owner(ALICE, "prod", "alice@example.com");
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "already an owner");

    let output = t.add_owner(BOB, "prod", "bob@example.com");
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "not an owner");
}

#[test]
fn test_secret_value_never_written_in_clear() {
    let t = Test::scenario();
    assert!(!t.contents().contains("s3cr3t"));
}
