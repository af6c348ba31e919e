//! Credential verification.

use tracing::debug;

use super::KeyFile;
use crate::core::cipher::{derive_key, PrivateKey};
use crate::core::constants::SALT_LEN;
use crate::core::model::Creds;
use crate::error::{KeyFileError, Result};

impl KeyFile {
    /// Check a user id and passphrase against the registered custodian.
    ///
    /// Unknown users and wrong passphrases both return `false`.
    pub fn check_creds(&self, creds: &Creds) -> bool {
        self.unlock_custodian(creds).is_ok()
    }

    /// Decrypt the caller's private key.
    ///
    /// The only place a custodian private key is decrypted. Every failure
    /// collapses to `KeyFileError::InvalidCreds`.
    pub(super) fn unlock_custodian(&self, creds: &Creds) -> Result<PrivateKey> {
        let invalid = || KeyFileError::InvalidCreds(creds.user_id().to_string());

        let Some(custodian) = self.custodians.get(creds.user_id()) else {
            // Unknown users pay for one derivation, like a wrong passphrase.
            let _ = derive_key(creds.passphrase(), &[0u8; SALT_LEN], &self.kdf_params);
            debug!(user = %creds.user_id(), "credential check failed");
            return Err(invalid().into());
        };

        custodian.unlock(creds.passphrase()).map_err(|_| {
            debug!(user = %creds.user_id(), "credential check failed");
            invalid().into()
        })
    }
}
