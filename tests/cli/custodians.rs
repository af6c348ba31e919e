//! Tests for custodian commands.

use crate::support::*;

#[test]
fn test_add_key_custodian() {
    let t = Test::init(ALICE);

    assert_success(&t.add_custodian(BOB));
    assert_eq!(
        t.keyfile().custodian_ids(),
        vec!["alice@example.com", "bob@example.com"]
    );
}

#[test]
fn test_add_duplicate_custodian_fails() {
    let t = Test::init(ALICE);
    let before = t.contents();

    let output = t.add_custodian(ALICE);
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "already exists");
    assert_eq!(t.contents(), before);
}

#[test]
fn test_invalid_user_id_rejected() {
    let t = Test::init(ALICE);

    let output = t.add_custodian(("not-an-email", "pw"));
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "expected an email address");
}

#[test]
fn test_set_passphrase() {
    let t = Test::scenario();

    assert_success(&t.set_passphrase(ALICE, "new-pw"));

    assert_exit_code(&t.decrypt(ALICE, "prod"), 1);
    let values = decrypted(&t.decrypt(("alice@example.com", "new-pw"), "prod"));
    assert_eq!(values["db_pass"], "s3cr3t");
}

#[test]
fn test_set_passphrase_wrong_current_fails() {
    let t = Test::scenario();
    let before = t.contents();

    let output = t.set_passphrase(("alice@example.com", "nope"), "new-pw");
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "Invalid user credentials");
    assert_eq!(t.contents(), before);
}

#[test]
fn test_rotate_custodian_key_keeps_access() {
    let t = Test::scenario();
    assert_success(&t.add_domain(ALICE, "staging"));
    let before = t.keyfile();

    assert_success(&t.rotate_custodian(ALICE));

    let after = t.keyfile();
    assert_ne!(
        before.custodian("alice@example.com").unwrap().public_key(),
        after.custodian("alice@example.com").unwrap().public_key()
    );
    assert_eq!(after.audit_log().len(), before.audit_log().len() + 3);
    assert_eq!(decrypted(&t.decrypt(ALICE, "prod"))["db_pass"], "s3cr3t");
}
