//! Key custodian type.
//!
//! A registered identity: an x25519 keypair whose private half is stored
//! encrypted under a key derived from the custodian's passphrase.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::cipher::{
    self, decrypt_at_rest, derive_key, encrypt_at_rest, generate_salt, AtRestCipher, KdfParams,
    PrivateKey,
};
use crate::core::model::Creds;
use crate::core::types::{PublicKey, UserId};
use crate::error::{CipherError, Result, StoreError};

/// A passphrase-protected identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCustodian {
    user_id: UserId,
    public_key: PublicKey,
    encrypted_private_key: String,
    kdf_salt: String,
    kdf_params: KdfParams,
    #[serde(default)]
    cipher: AtRestCipher,
}

impl KeyCustodian {
    /// Issue a new custodian with a freshly generated keypair.
    ///
    /// # Errors
    ///
    /// Returns a `CipherError` if key derivation or encryption fails.
    pub fn issue(creds: &Creds, params: &KdfParams) -> Result<Self> {
        let private_key = PrivateKey::generate();
        Self::protect(creds.user_id(), &private_key, creds.passphrase(), params)
    }

    /// Build a record protecting `private_key` under `passphrase`.
    ///
    /// Always draws a fresh salt.
    pub(crate) fn protect(
        user_id: &str,
        private_key: &PrivateKey,
        passphrase: &str,
        params: &KdfParams,
    ) -> Result<Self> {
        let salt = generate_salt();
        let kek = derive_key(passphrase, &salt, params)?;
        let secret = private_key.to_secret_string();
        let encrypted_private_key = encrypt_at_rest(&kek, secret.as_bytes())?;

        trace!(user = %user_id, "custodian key protected");

        Ok(Self {
            user_id: user_id.to_string(),
            public_key: private_key.public_key(),
            encrypted_private_key,
            kdf_salt: BASE64.encode(salt),
            kdf_params: *params,
            cipher: AtRestCipher::ChaCha20Poly1305,
        })
    }

    /// Decrypt the private key with `passphrase`.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::Decryption` if the passphrase is wrong or the
    /// stored blob is damaged.
    pub(crate) fn unlock(&self, passphrase: &str) -> Result<PrivateKey> {
        let salt = BASE64
            .decode(&self.kdf_salt)
            .map_err(|_| CipherError::Decryption)?;
        let kek = derive_key(passphrase, &salt, &self.kdf_params)?;
        let plaintext = decrypt_at_rest(&kek, &self.encrypted_private_key)?;
        let text = std::str::from_utf8(&plaintext).map_err(|_| CipherError::Decryption)?;
        let private_key = PrivateKey::from_secret_str(text)?;

        if private_key.public_key() != self.public_key {
            return Err(CipherError::InvalidPrivateKey.into());
        }

        Ok(private_key)
    }

    /// Custodian user id
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Custodian public key (age recipient)
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Encrypted private key blob
    pub fn encrypted_private_key(&self) -> &str {
        &self.encrypted_private_key
    }

    /// Base64 KDF salt
    pub fn kdf_salt(&self) -> &str {
        &self.kdf_salt
    }

    /// Parameters the stored key was derived with
    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf_params
    }

    /// Structural checks applied when loading a store.
    pub(crate) fn validate(&self) -> Result<()> {
        cipher::parse_recipient(&self.public_key).map_err(|_| {
            StoreError::Invalid(format!("custodian {} has an invalid public key", self.user_id))
        })?;
        BASE64.decode(&self.kdf_salt).map_err(|_| {
            StoreError::Invalid(format!("custodian {} has an invalid salt", self.user_id))
        })?;
        self.kdf_params.validate().map_err(|e| {
            StoreError::Invalid(format!(
                "custodian {} has unusable kdf parameters: {}",
                self.user_id, e
            ))
        })?;
        Ok(())
    }
}
