//! Command helper methods for Test.

use super::{Test, CLEARED_ENV, TEST_ENV};
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// A `pprotect` command running in the test directory.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("pprotect").expect("failed to find pprotect binary");
        for key in CLEARED_ENV {
            cmd.env_remove(key);
        }
        cmd.envs(TEST_ENV.iter().copied());
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// A command acting as `user`, credentials supplied through the environment.
    pub fn as_user(&self, user: (&str, &str)) -> Command {
        let mut cmd = self.cmd();
        cmd.env("PPROTECT_USER", user.0)
            .env("PPROTECT_PASSPHRASE", user.1);
        cmd
    }

    fn run(mut cmd: Command, what: &str) -> Output {
        cmd.output()
            .unwrap_or_else(|e| panic!("failed to run pprotect {}: {}", what, e))
    }

    /// `pprotect init` as `user`.
    pub fn init_cmd(&self, user: (&str, &str)) -> Output {
        let mut cmd = self.as_user(user);
        cmd.arg("init");
        Self::run(cmd, "init")
    }

    /// `pprotect add-key-custodian` for `user`.
    pub fn add_custodian(&self, user: (&str, &str)) -> Output {
        let mut cmd = self.as_user(user);
        cmd.arg("add-key-custodian");
        Self::run(cmd, "add-key-custodian")
    }

    /// `pprotect add-domain` as `user`.
    pub fn add_domain(&self, user: (&str, &str), domain: &str) -> Output {
        let mut cmd = self.as_user(user);
        cmd.args(["add-domain", "--domain", domain]);
        Self::run(cmd, "add-domain")
    }

    /// `pprotect set-secret`, with no credentials at all.
    pub fn set_secret(&self, domain: &str, secret: &str, value: &str) -> Output {
        let mut cmd = self.cmd();
        cmd.args([
            "set-secret",
            "--domain",
            domain,
            "--secret",
            secret,
            "--value",
            value,
        ]);
        Self::run(cmd, "set-secret")
    }

    /// `pprotect add-owner` as `user`.
    pub fn add_owner(&self, user: (&str, &str), domain: &str, owner: &str) -> Output {
        let mut cmd = self.as_user(user);
        cmd.args(["add-owner", "--domain", domain, "--owner", owner]);
        Self::run(cmd, "add-owner")
    }

    /// `pprotect decrypt-domain` as `user`.
    pub fn decrypt(&self, user: (&str, &str), domain: &str) -> Output {
        let mut cmd = self.as_user(user);
        cmd.args(["decrypt-domain", "--domain", domain]);
        Self::run(cmd, "decrypt-domain")
    }

    /// `pprotect rotate-domain-key` as `user`.
    pub fn rotate_domain(&self, user: (&str, &str), domain: &str) -> Output {
        let mut cmd = self.as_user(user);
        cmd.args(["rotate-domain-key", "--domain", domain]);
        Self::run(cmd, "rotate-domain-key")
    }

    /// `pprotect rotate-key-custodian-key` as `user`.
    pub fn rotate_custodian(&self, user: (&str, &str)) -> Output {
        let mut cmd = self.as_user(user);
        cmd.arg("rotate-key-custodian-key");
        Self::run(cmd, "rotate-key-custodian-key")
    }

    /// `pprotect set-key-custodian-passphrase` for `user`.
    pub fn set_passphrase(&self, user: (&str, &str), new_passphrase: &str) -> Output {
        let mut cmd = self.as_user(user);
        cmd.env("PPROTECT_NEW_PASSPHRASE", new_passphrase)
            .arg("set-key-custodian-passphrase");
        Self::run(cmd, "set-key-custodian-passphrase")
    }
}
