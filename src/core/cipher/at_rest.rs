//! Authenticated symmetric encryption for data at rest.
//!
//! Output is `base64(nonce || ciphertext || tag)`. Decryption either returns
//! the full plaintext or fails with `CipherError::Decryption`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::SymmetricKey;
use crate::core::constants::NONCE_LEN;
use crate::error::{CipherError, Result};

/// At-rest cipher identifier, persisted with each custodian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AtRestCipher {
    #[default]
    #[serde(rename = "chacha20poly1305")]
    ChaCha20Poly1305,
}

/// Encrypt `plaintext` under `key` with a random nonce.
///
/// # Errors
///
/// Returns `CipherError::EncryptionFailed` if the AEAD rejects the input.
pub fn encrypt_at_rest(key: &SymmetricKey, plaintext: &[u8]) -> Result<String> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(&key[..]));

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(blob))
}

/// Decrypt a value produced by [`encrypt_at_rest`].
///
/// # Errors
///
/// Returns `CipherError::Decryption` for a wrong key, tampering, truncation or
/// malformed encoding.
pub fn decrypt_at_rest(key: &SymmetricKey, ciphertext: &str) -> Result<Zeroizing<Vec<u8>>> {
    let blob = BASE64
        .decode(ciphertext.trim())
        .map_err(|_| CipherError::Decryption)?;
    if blob.len() < NONCE_LEN {
        return Err(CipherError::Decryption.into());
    }

    let (nonce, body) = blob.split_at(NONCE_LEN);
    let cipher = ChaCha20Poly1305::new(Key::from_slice(&key[..]));
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), body)
        .map_err(|_| CipherError::Decryption)?;

    Ok(Zeroizing::new(plaintext))
}
