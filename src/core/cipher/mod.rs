//! Cryptographic primitives.
//!
//! Everything the store needs from cryptography, as pure functions over bytes
//! and strings. No function here keeps state between calls.
//!
//! ## Primitives
//!
//! - **kdf**: Argon2id passphrase key derivation with persisted parameters.
//! - **at_rest**: ChaCha20-Poly1305 for custodian private keys at rest.
//! - **age**: x25519 keypairs and anonymous-sender sealed envelopes
//!   (age format, ASCII armor) for domain keys and secret values.

use zeroize::{Zeroize, Zeroizing};

use crate::core::types::{PublicKey, SealedValue};
use crate::error::{CipherError, Result};

mod age;
mod at_rest;
mod kdf;

pub use self::age::{parse_recipient, Age, PrivateKey};
pub use at_rest::{decrypt_at_rest, encrypt_at_rest, AtRestCipher};
pub use kdf::{derive_key, generate_salt, KdfAlgorithm, KdfParams, SymmetricKey};

/// Sealed-envelope backend trait.
///
/// Sealing needs only the recipient's public half; unsealing needs the
/// matching private half.
pub trait Cipher {
    /// Type representing a recipient public key.
    type Recipient;

    /// Type representing a private identity/key.
    type Identity;

    /// Seal plaintext for a single recipient.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::EncryptionFailed` or `CipherError::ArmorFailed`.
    fn seal(&self, plaintext: &[u8], recipient: &Self::Recipient) -> Result<SealedValue>;

    /// Open a sealed value.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::Unwrap` if the envelope is malformed, tampered,
    /// or was not sealed for `identity`.
    fn unseal(&self, sealed: &str, identity: &Self::Identity) -> Result<Zeroizing<Vec<u8>>>;

    /// Backend name for display/logging.
    fn name(&self) -> &'static str;
}

/// Generate a fresh x25519 keypair.
pub fn generate_keypair() -> (PublicKey, PrivateKey) {
    let private_key = PrivateKey::generate();
    (private_key.public_key(), private_key)
}

/// Seal `plaintext` for the holder of `public_key`.
///
/// # Errors
///
/// Returns `CipherError::InvalidPublicKey` if the key does not parse, or an
/// encryption error from the backend.
pub fn seal(public_key: &str, plaintext: &[u8]) -> Result<SealedValue> {
    let recipient = parse_recipient(public_key)?;
    Age.seal(plaintext, &recipient)
}

/// Open a sealed value with `private_key`.
///
/// # Errors
///
/// Returns `CipherError::Unwrap` on any failure.
pub fn unseal(private_key: &PrivateKey, sealed: &str) -> Result<Zeroizing<Vec<u8>>> {
    Age.unseal(sealed, private_key.as_age())
}

/// Open a sealed value whose plaintext is UTF-8 text.
///
/// # Errors
///
/// Returns `CipherError::Unwrap` on any failure, including invalid UTF-8.
pub fn unseal_string(private_key: &PrivateKey, sealed: &str) -> Result<Zeroizing<String>> {
    let mut bytes = unseal(private_key, sealed)?;
    let owned = std::mem::take(&mut *bytes);
    String::from_utf8(owned).map(Zeroizing::new).map_err(|e| {
        let mut raw = e.into_bytes();
        raw.zeroize();
        CipherError::Unwrap("sealed value is not valid UTF-8".to_string()).into()
    })
}

/// Seal a domain private key for an owner.
pub(crate) fn wrap_private_key(owner_public_key: &str, key: &PrivateKey) -> Result<SealedValue> {
    let secret = key.to_secret_string();
    seal(owner_public_key, secret.as_bytes())
}

/// Recover a private key sealed with [`wrap_private_key`].
pub(crate) fn unwrap_private_key(owner_key: &PrivateKey, wrapping: &str) -> Result<PrivateKey> {
    let secret = unseal_string(owner_key, wrapping)?;
    PrivateKey::from_secret_str(&secret)
        .map_err(|_| CipherError::Unwrap("wrapped value is not a private key".to_string()).into())
}
