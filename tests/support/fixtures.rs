//! Test fixtures and constants.

/// First custodian used across tests.
pub const ALICE: (&str, &str) = ("alice@example.com", "pw1");

/// Second custodian.
pub const BOB: (&str, &str) = ("bob@example.com", "pw2");

/// A user who is never registered.
pub const CAROL: (&str, &str) = ("carol@example.com", "pw3");

/// Environment applied to every child process: cheap key derivation and
/// uncolored output.
pub const TEST_ENV: &[(&str, &str)] = &[
    ("PPROTECT_KDF_MEMORY_KIB", "1024"),
    ("PPROTECT_KDF_ITERATIONS", "1"),
    ("PPROTECT_KDF_PARALLELISM", "1"),
    ("NO_COLOR", "1"),
];

/// Variables that must not leak in from the developer's shell.
pub const CLEARED_ENV: &[&str] = &[
    "PPROTECT_FILE",
    "PPROTECT_USER",
    "PPROTECT_PASSPHRASE",
    "PPROTECT_NEW_PASSPHRASE",
    "PPROTECT_LOG",
];
