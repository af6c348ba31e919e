//! Key custodian registry operations.

use tracing::{debug, info};

use super::KeyFile;
use crate::core::cipher::PrivateKey;
use crate::core::model::{AuditAction, Creds, KeyCustodian};
use crate::core::validation::{validate_passphrase, validate_user_id};
use crate::error::{KeyFileError, Result};

impl KeyFile {
    /// Register a new key custodian.
    ///
    /// Generates a keypair and stores the private half encrypted under a key
    /// derived from `creds.passphrase` with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a malformed user id or empty passphrase,
    /// and `KeyFileError::DuplicateCustodian` if the user id is taken.
    pub fn add_key_custodian(&self, creds: &Creds) -> Result<KeyFile> {
        let user_id = creds.user_id();
        validate_user_id(user_id)?;
        validate_passphrase(creds.passphrase())?;

        if self.custodians.contains_key(user_id) {
            return Err(KeyFileError::DuplicateCustodian(user_id.to_string()).into());
        }

        debug!(user = %user_id, "adding key custodian");
        let custodian = KeyCustodian::issue(creds, &self.kdf_params)?;

        let mut next = self.clone();
        next.custodians.insert(user_id.to_string(), custodian);
        next.audit_log
            .append(AuditAction::AddKeyCustodian, user_id, user_id);

        info!(user = %user_id, "key custodian added");
        Ok(next)
    }

    /// Change a custodian's passphrase.
    ///
    /// The keypair stays the same, so wrappings held in domains are untouched.
    ///
    /// # Errors
    ///
    /// Returns `KeyFileError::InvalidCreds` if `creds` do not verify, and
    /// `ValidationError::EmptyPassphrase` for an empty new passphrase.
    pub fn set_key_custodian_passphrase(
        &self,
        creds: &Creds,
        new_passphrase: &str,
    ) -> Result<KeyFile> {
        let private_key = self.unlock_custodian(creds)?;
        validate_passphrase(new_passphrase)?;

        let user_id = creds.user_id();
        debug!(user = %user_id, "re-protecting custodian key");
        let custodian =
            KeyCustodian::protect(user_id, &private_key, new_passphrase, &self.kdf_params)?;

        let mut next = self.clone();
        next.custodians.insert(user_id.to_string(), custodian);
        next.audit_log
            .append(AuditAction::SetKeyCustodianPassphrase, user_id, user_id);

        info!(user = %user_id, "key custodian passphrase changed");
        Ok(next)
    }

    /// Replace a custodian's keypair, keeping the passphrase.
    ///
    /// Each domain the custodian owns gets its wrapping re-sealed for the new
    /// public key. Other owners' wrappings and all secrets are untouched.
    ///
    /// # Errors
    ///
    /// Returns `KeyFileError::InvalidCreds` if `creds` do not verify, and
    /// `CipherError::Unwrap` if an existing wrapping cannot be opened.
    pub fn rotate_key_custodian_key(&self, creds: &Creds) -> Result<KeyFile> {
        let old_key = self.unlock_custodian(creds)?;
        let user_id = creds.user_id();

        let new_key = PrivateKey::generate();
        let new_public_key = new_key.public_key();

        let mut next = self.clone();
        let mut rewrapped = Vec::new();
        for domain in next.domains.values_mut() {
            if !domain.is_owner(user_id) {
                continue;
            }
            let domain_key = domain.unlock(user_id, &old_key)?;
            domain.wrap_for(user_id, &new_public_key, &domain_key)?;
            rewrapped.push(domain.name().to_string());
        }

        let custodian =
            KeyCustodian::protect(user_id, &new_key, creds.passphrase(), &self.kdf_params)?;
        next.custodians.insert(user_id.to_string(), custodian);

        next.audit_log
            .append(AuditAction::RotateKeyCustodianKey, user_id, user_id);
        for domain_name in &rewrapped {
            next.audit_log
                .append(AuditAction::RewrapDomainKey, user_id, domain_name);
        }

        info!(user = %user_id, domains = rewrapped.len(), "key custodian key rotated");
        Ok(next)
    }
}
