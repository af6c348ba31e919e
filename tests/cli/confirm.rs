//! Tests for `--confirm-diff`.

use crate::support::*;

#[test]
fn test_declined_diff_writes_nothing() {
    let t = Test::scenario();
    let before = t.contents();

    let output = t
        .cmd()
        .args([
            "--confirm-diff",
            "set-secret",
            "--domain",
            "prod",
            "--secret",
            "new_one",
            "--value",
            "v",
        ])
        .write_stdin("n\n")
        .output()
        .unwrap();

    assert_exit_code(&output, 0);
    assert_stdout_contains(&output, "Changes to be written:");
    assert_stdout_contains(&output, "--- ");
    assert_stdout_contains(&output, "new_one:");
    assert_stdout_contains(&output, "Aborting...");
    assert_eq!(t.contents(), before);
}

#[test]
fn test_accepted_diff_writes() {
    let t = Test::scenario();

    let output = t
        .cmd()
        .args([
            "--confirm-diff",
            "set-secret",
            "--domain",
            "prod",
            "--secret",
            "new_one",
            "--value",
            "v",
        ])
        .write_stdin("yes\n")
        .output()
        .unwrap();

    assert_success(&output);
    assert_eq!(decrypted(&t.decrypt(ALICE, "prod"))["new_one"], "v");
}

#[test]
fn test_empty_answer_aborts() {
    let t = Test::scenario();
    let before = t.contents();

    let output = t
        .as_user(ALICE)
        .args(["--confirm-diff", "rotate-domain-key", "--domain", "prod"])
        .write_stdin("\n")
        .output()
        .unwrap();

    assert_exit_code(&output, 0);
    assert_eq!(t.contents(), before);
}
