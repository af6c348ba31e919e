//! Age sealed-envelope backend.
//!
//! Provides sealing/unsealing using the age format with x25519 keys
//! and ASCII armor encoding.

use std::io::{Read, Write};

use ::age::secrecy::ExposeSecret;
use ::age::x25519;
use tracing::trace;
use zeroize::Zeroizing;

use super::Cipher;
use crate::core::types::{PublicKey, SealedValue};
use crate::error::{CipherError, Result};

/// Age-based sealed-envelope backend using x25519 keys
pub struct Age;

impl Cipher for Age {
    type Recipient = x25519::Recipient;
    type Identity = x25519::Identity;

    fn name(&self) -> &'static str {
        "age"
    }

    fn seal(&self, plaintext: &[u8], recipient: &x25519::Recipient) -> Result<SealedValue> {
        trace!(plaintext_len = plaintext.len(), "sealing");

        let encryptor =
            age::Encryptor::with_recipients(std::iter::once(recipient as &dyn age::Recipient))
                .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        let mut sealed = Vec::new();
        let armor = age::armor::ArmoredWriter::wrap_output(&mut sealed, age::armor::Format::AsciiArmor)
            .map_err(|e| CipherError::ArmorFailed(format!("{}", e)))?;
        let mut writer = encryptor
            .wrap_output(armor)
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        writer
            .write_all(plaintext)
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;
        let armored = writer
            .finish()
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;
        armored
            .finish()
            .map_err(|e| CipherError::ArmorFailed(format!("{}", e)))?;

        trace!(sealed_len = sealed.len(), "sealed");

        String::from_utf8(sealed)
            .map_err(|e| CipherError::ArmorFailed(format!("UTF-8 error: {}", e)).into())
    }

    fn unseal(&self, sealed: &str, identity: &x25519::Identity) -> Result<Zeroizing<Vec<u8>>> {
        trace!(sealed_len = sealed.len(), "unsealing");

        let reader = age::armor::ArmoredReader::new(sealed.as_bytes());
        let decryptor =
            age::Decryptor::new(reader).map_err(|e| CipherError::Unwrap(format!("{}", e)))?;

        let mut reader = decryptor
            .decrypt(std::iter::once(identity as &dyn age::Identity))
            .map_err(|e| CipherError::Unwrap(format!("{}", e)))?;

        let mut plaintext = Zeroizing::new(Vec::new());
        reader
            .read_to_end(&mut plaintext)
            .map_err(|e| CipherError::Unwrap(format!("{}", e)))?;

        Ok(plaintext)
    }
}

/// An x25519 private key.
///
/// The underlying secret is wiped on drop. The text form is only handed out
/// in zeroizing storage.
pub struct PrivateKey(x25519::Identity);

impl PrivateKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        Self(x25519::Identity::generate())
    }

    /// Parse an `AGE-SECRET-KEY-1...` string.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::InvalidPrivateKey` if the string is not a key.
    pub fn from_secret_str(secret: &str) -> Result<Self> {
        secret
            .trim()
            .parse::<x25519::Identity>()
            .map(Self)
            .map_err(|_| CipherError::InvalidPrivateKey.into())
    }

    /// Secret key text, wiped when dropped.
    pub fn to_secret_string(&self) -> Zeroizing<String> {
        Zeroizing::new(self.0.to_string().expose_secret().to_string())
    }

    /// Matching public key
    pub fn public_key(&self) -> PublicKey {
        self.0.to_public().to_string()
    }

    /// Reference to the inner age identity
    pub fn as_age(&self) -> &x25519::Identity {
        &self.0
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// Parse a public key string into an age recipient
///
/// # Errors
///
/// Returns `CipherError::InvalidPublicKey` if the key format is invalid.
pub fn parse_recipient(key: &str) -> Result<x25519::Recipient> {
    key.parse::<x25519::Recipient>()
        .map_err(|_| CipherError::InvalidPublicKey(key.to_string()).into())
}
