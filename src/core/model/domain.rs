//! Domain type.
//!
//! A named group of secrets with its own keypair. The domain private key is
//! stored once per owner, sealed to that owner's public key; secrets are
//! sealed to the domain public key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::cipher::{self, PrivateKey};
use crate::core::types::{DomainName, Plaintexts, PublicKey, SealedValue, SecretName, UserId};
use crate::error::{CipherError, KeyFileError, Result, StoreError};

/// A group of secrets and the owners who can read them.
///
/// The owner set is exactly the key set of `owner_wrappings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    name: DomainName,
    public_key: PublicKey,
    owner_wrappings: BTreeMap<UserId, SealedValue>,
    #[serde(default)]
    secrets: BTreeMap<SecretName, SealedValue>,
}

impl Domain {
    /// Create a domain with a fresh keypair and a single owner.
    pub(crate) fn create(name: &str, owner_id: &str, owner_public_key: &str) -> Result<Self> {
        let (public_key, private_key) = cipher::generate_keypair();
        let wrapping = cipher::wrap_private_key(owner_public_key, &private_key)?;

        Ok(Self {
            name: name.to_string(),
            public_key,
            owner_wrappings: BTreeMap::from([(owner_id.to_string(), wrapping)]),
            secrets: BTreeMap::new(),
        })
    }

    /// Domain name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Domain public key
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Owner user ids, sorted
    pub fn owners(&self) -> impl Iterator<Item = &str> {
        self.owner_wrappings.keys().map(String::as_str)
    }

    /// Whether `user_id` holds a wrapping of the domain key
    pub fn is_owner(&self, user_id: &str) -> bool {
        self.owner_wrappings.contains_key(user_id)
    }

    /// The sealed domain key held for `user_id`
    pub fn wrapping(&self, user_id: &str) -> Option<&str> {
        self.owner_wrappings.get(user_id).map(String::as_str)
    }

    /// Secret names, sorted
    pub fn secret_names(&self) -> impl Iterator<Item = &str> {
        self.secrets.keys().map(String::as_str)
    }

    /// The sealed value of one secret
    pub fn sealed_secret(&self, secret_name: &str) -> Option<&str> {
        self.secrets.get(secret_name).map(String::as_str)
    }

    /// Recover the domain private key through `user_id`'s wrapping.
    ///
    /// # Errors
    ///
    /// Returns `KeyFileError::AccessDenied` if the user is not an owner, and
    /// `CipherError::Unwrap` if the wrapping does not open or does not hold
    /// the current domain key.
    pub(crate) fn unlock(&self, user_id: &str, owner_key: &PrivateKey) -> Result<PrivateKey> {
        let wrapping = self
            .owner_wrappings
            .get(user_id)
            .ok_or_else(|| KeyFileError::AccessDenied {
                domain: self.name.clone(),
                user: user_id.to_string(),
            })?;

        let domain_key = cipher::unwrap_private_key(owner_key, wrapping)?;
        if domain_key.public_key() != self.public_key {
            return Err(CipherError::Unwrap(format!(
                "wrapping for {} does not hold the current key of {}",
                user_id, self.name
            ))
            .into());
        }

        Ok(domain_key)
    }

    /// Seal `value` to the domain key, creating or replacing `secret_name`.
    pub(crate) fn set_secret(&mut self, secret_name: &str, value: &str) -> Result<()> {
        let sealed = cipher::seal(&self.public_key, value.as_bytes())?;
        self.secrets.insert(secret_name.to_string(), sealed);
        Ok(())
    }

    /// Open every secret. Fails as a whole if any single secret fails.
    pub(crate) fn decrypt_secrets(&self, domain_key: &PrivateKey) -> Result<Plaintexts> {
        let mut plaintexts = Plaintexts::new();
        for (name, sealed) in &self.secrets {
            let value = cipher::unseal_string(domain_key, sealed)?;
            plaintexts.insert(name.clone(), value);
        }
        trace!(domain = %self.name, secrets = plaintexts.len(), "domain decrypted");
        Ok(plaintexts)
    }

    /// Seal the domain key for `user_id`, replacing any existing wrapping.
    pub(crate) fn wrap_for(
        &mut self,
        user_id: &str,
        owner_public_key: &str,
        domain_key: &PrivateKey,
    ) -> Result<()> {
        let wrapping = cipher::wrap_private_key(owner_public_key, domain_key)?;
        self.owner_wrappings.insert(user_id.to_string(), wrapping);
        Ok(())
    }

    /// Replace the domain keypair.
    ///
    /// Every secret is re-sealed to the new public key and the new private key
    /// is sealed for every current owner. Nothing is replaced until all of it
    /// has succeeded.
    pub(crate) fn rotate(
        &mut self,
        old_key: &PrivateKey,
        owner_keys: &BTreeMap<UserId, PublicKey>,
    ) -> Result<()> {
        let (public_key, private_key) = cipher::generate_keypair();

        let plaintexts = self.decrypt_secrets(old_key)?;
        let secrets = plaintexts
            .iter()
            .map(|(name, value)| -> Result<(SecretName, SealedValue)> {
                Ok((name.clone(), cipher::seal(&public_key, value.as_bytes())?))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        let owner_wrappings = self
            .owner_wrappings
            .keys()
            .map(|user_id| -> Result<(UserId, SealedValue)> {
                let owner_public_key = owner_keys
                    .get(user_id)
                    .ok_or_else(|| KeyFileError::UnknownUser(user_id.clone()))?;
                Ok((
                    user_id.clone(),
                    cipher::wrap_private_key(owner_public_key, &private_key)?,
                ))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        self.public_key = public_key;
        self.secrets = secrets;
        self.owner_wrappings = owner_wrappings;
        Ok(())
    }

    /// Structural checks applied when loading a store.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.owner_wrappings.is_empty() {
            return Err(StoreError::Invalid(format!("domain {} has no owners", self.name)).into());
        }
        cipher::parse_recipient(&self.public_key).map_err(|_| {
            StoreError::Invalid(format!("domain {} has an invalid public key", self.name))
        })?;
        Ok(())
    }
}
