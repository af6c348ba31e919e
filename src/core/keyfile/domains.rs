//! Domain and secret operations.

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::KeyFile;
use crate::core::cipher::PrivateKey;
use crate::core::constants::ANONYMOUS;
use crate::core::model::{AuditAction, Creds, Domain};
use crate::core::types::{Plaintexts, PublicKey, UserId};
use crate::core::validation::validate_name;
use crate::error::{KeyFileError, Result};

impl KeyFile {
    /// Create a domain owned by `owner_user_id`.
    ///
    /// # Errors
    ///
    /// Returns `KeyFileError::DuplicateDomain` if the name is taken and
    /// `KeyFileError::UnknownUser` if the owner is not a registered custodian.
    pub fn add_domain(&self, domain_name: &str, owner_user_id: &str) -> Result<KeyFile> {
        validate_name("domain name", domain_name)?;
        if self.domains.contains_key(domain_name) {
            return Err(KeyFileError::DuplicateDomain(domain_name.to_string()).into());
        }
        let owner = self.require_custodian(owner_user_id)?;

        debug!(domain = %domain_name, owner = %owner_user_id, "creating domain");
        let domain = Domain::create(domain_name, owner_user_id, owner.public_key())?;

        let mut next = self.clone();
        next.domains.insert(domain_name.to_string(), domain);
        next.audit_log
            .append(AuditAction::AddDomain, owner_user_id, domain_name);

        info!(domain = %domain_name, "domain added");
        Ok(next)
    }

    /// Create or overwrite a secret.
    ///
    /// Needs no credentials: the value is sealed to the domain public key,
    /// which any writer of the file can read. Only owners can decrypt it.
    ///
    /// # Errors
    ///
    /// Returns `KeyFileError::DomainNotFound` if the domain does not exist.
    pub fn set_secret(&self, domain_name: &str, secret_name: &str, value: &str) -> Result<KeyFile> {
        validate_name("secret name", secret_name)?;
        self.require_domain(domain_name)?;

        let mut next = self.clone();
        if let Some(domain) = next.domains.get_mut(domain_name) {
            domain.set_secret(secret_name, value)?;
        }
        next.audit_log.append(
            AuditAction::SetSecret,
            ANONYMOUS,
            &format!("{}/{}", domain_name, secret_name),
        );

        info!(domain = %domain_name, secret = %secret_name, "secret set");
        Ok(next)
    }

    /// Decrypt every secret in a domain.
    ///
    /// Either all secrets are returned or none are.
    ///
    /// # Errors
    ///
    /// Returns `KeyFileError::InvalidCreds`, `KeyFileError::DomainNotFound`,
    /// `KeyFileError::AccessDenied` for a non-owner, or `CipherError::Unwrap`
    /// if any sealed value fails to open.
    pub fn decrypt_domain(&self, domain_name: &str, creds: &Creds) -> Result<Plaintexts> {
        let (domain, domain_key) = self.unlock_domain(domain_name, creds)?;
        let plaintexts = domain.decrypt_secrets(&domain_key)?;

        debug!(domain = %domain_name, user = %creds.user_id(), secrets = plaintexts.len(), "domain decrypted");
        Ok(plaintexts)
    }

    /// Grant `new_owner_user_id` access to a domain.
    ///
    /// The caller must be a current owner. Existing wrappings and secret
    /// ciphertexts are untouched.
    ///
    /// # Errors
    ///
    /// The caller checks of [`KeyFile::decrypt_domain`], plus
    /// `KeyFileError::UnknownUser` and `KeyFileError::DuplicateOwner`.
    pub fn add_owner(
        &self,
        domain_name: &str,
        new_owner_user_id: &str,
        creds: &Creds,
    ) -> Result<KeyFile> {
        let (domain, domain_key) = self.unlock_domain(domain_name, creds)?;
        let new_owner = self.require_custodian(new_owner_user_id)?;
        if domain.is_owner(new_owner_user_id) {
            return Err(KeyFileError::DuplicateOwner {
                domain: domain_name.to_string(),
                user: new_owner_user_id.to_string(),
            }
            .into());
        }

        let mut next = self.clone();
        if let Some(domain) = next.domains.get_mut(domain_name) {
            domain.wrap_for(new_owner_user_id, new_owner.public_key(), &domain_key)?;
        }
        next.audit_log.append(
            AuditAction::AddOwner,
            creds.user_id(),
            &format!("{}:{}", domain_name, new_owner_user_id),
        );

        info!(domain = %domain_name, owner = %new_owner_user_id, "owner added");
        Ok(next)
    }

    /// Replace a domain's keypair.
    ///
    /// Secrets are re-sealed and every current owner receives a wrapping of
    /// the new key. The superseded key opens nothing in the result.
    ///
    /// # Errors
    ///
    /// The caller checks of [`KeyFile::decrypt_domain`], or a `CipherError`
    /// if any value fails to open or seal.
    pub fn rotate_domain_key(&self, domain_name: &str, creds: &Creds) -> Result<KeyFile> {
        let (domain, old_key) = self.unlock_domain(domain_name, creds)?;

        let owner_keys = domain
            .owners()
            .map(|user_id| -> Result<(UserId, PublicKey)> {
                let custodian = self.require_custodian(user_id)?;
                Ok((user_id.to_string(), custodian.public_key().to_string()))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        let mut next = self.clone();
        if let Some(domain) = next.domains.get_mut(domain_name) {
            domain.rotate(&old_key, &owner_keys)?;
        }
        next.audit_log
            .append(AuditAction::RotateDomainKey, creds.user_id(), domain_name);

        info!(domain = %domain_name, owners = owner_keys.len(), "domain key rotated");
        Ok(next)
    }

    /// Verify the caller, find the domain, and recover its private key through
    /// the caller's wrapping.
    fn unlock_domain(&self, domain_name: &str, creds: &Creds) -> Result<(&Domain, PrivateKey)> {
        let custodian_key = self.unlock_custodian(creds)?;
        let domain = self.require_domain(domain_name)?;
        let domain_key = domain.unlock(creds.user_id(), &custodian_key)?;
        Ok((domain, domain_key))
    }
}
