//! Test support utilities for pocket-protector integration tests.
//!
//! Provides an isolated store directory and helpers for driving `pprotect`.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::PathBuf;

use pocket_protector::core::cipher::KdfParams;
use pocket_protector::KeyFile;
use tempfile::TempDir;

/// Test environment with an isolated temp directory.
///
/// Child processes run with `.current_dir()` set to the temp dir, so tests
/// can run in parallel without touching process-global state.
pub struct Test {
    /// Directory holding the store file
    pub dir: TempDir,
}

impl Test {
    /// A directory with no store file yet.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// A store initialized with `user` as the first custodian.
    pub fn init(user: (&str, &str)) -> Self {
        let t = Self::new();
        assert_success(&t.init_cmd(user));
        t
    }

    /// alice and bob registered; alice owns `prod` holding `db_pass`.
    pub fn scenario() -> Self {
        let t = Self::init(ALICE);
        assert_success(&t.add_custodian(BOB));
        assert_success(&t.add_domain(ALICE, "prod"));
        assert_success(&t.set_secret("prod", "db_pass", "s3cr3t"));
        t
    }

    /// Path of the store file.
    pub fn path(&self) -> PathBuf {
        self.dir.path().join("protected.yaml")
    }

    /// Raw store contents.
    pub fn contents(&self) -> String {
        std::fs::read_to_string(self.path()).expect("failed to read store")
    }

    /// Load the store through the library.
    pub fn keyfile(&self) -> KeyFile {
        KeyFile::from_file_with(self.path(), cheap_kdf()).expect("failed to load store")
    }
}

/// KDF parameters matching the ones the binary is run with.
pub fn cheap_kdf() -> KdfParams {
    KdfParams::new(1024, 1, 1)
}
