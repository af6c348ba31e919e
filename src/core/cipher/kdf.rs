//! Passphrase key derivation.
//!
//! Argon2id with parameters stored next to each custodian so that stores
//! created under different settings stay readable.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::trace;
use zeroize::Zeroizing;

use crate::core::constants::{
    KDF_ITERATIONS, KDF_MAX_ITERATIONS, KDF_MAX_MEMORY_KIB, KDF_MAX_PARALLELISM, KDF_MEMORY_KIB,
    KDF_PARALLELISM, KEY_LEN, SALT_LEN,
};
use crate::error::{CipherError, Result};

/// A derived symmetric key, wiped on drop.
pub type SymmetricKey = Zeroizing<[u8; KEY_LEN]>;

/// Password hashing algorithm identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KdfAlgorithm {
    Argon2id,
}

/// Cost parameters for key derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub algorithm: KdfAlgorithm,
    /// Memory cost in KiB.
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl KdfParams {
    /// Argon2id parameters with the given costs.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            algorithm: KdfAlgorithm::Argon2id,
            memory_kib,
            iterations,
            parallelism,
        }
    }

    /// Check the parameters are accepted by the algorithm and stay within
    /// the supported cost ceiling.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::KeyDerivation` describing the rejected value.
    pub fn validate(&self) -> Result<()> {
        self.argon2().map(|_| ())
    }

    /// Whether any cost is below the built-in defaults.
    pub fn is_below_recommended(&self) -> bool {
        self.memory_kib < KDF_MEMORY_KIB
            || self.iterations < KDF_ITERATIONS
            || self.parallelism < KDF_PARALLELISM
    }

    fn check_ceiling(&self) -> Result<()> {
        let limits = [
            ("memory_kib", self.memory_kib, KDF_MAX_MEMORY_KIB),
            ("iterations", self.iterations, KDF_MAX_ITERATIONS),
            ("parallelism", self.parallelism, KDF_MAX_PARALLELISM),
        ];
        for (field, value, max) in limits {
            if value > max {
                return Err(CipherError::KeyDerivation(format!(
                    "{} {} exceeds maximum {}",
                    field, value, max
                ))
                .into());
            }
        }
        Ok(())
    }

    fn argon2(&self) -> Result<Argon2<'static>> {
        self.check_ceiling()?;
        let params = Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LEN),
        )
        .map_err(|e| CipherError::KeyDerivation(format!("invalid argon2 params: {}", e)))?;

        Ok(match self.algorithm {
            KdfAlgorithm::Argon2id => Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::new(KDF_MEMORY_KIB, KDF_ITERATIONS, KDF_PARALLELISM)
    }
}

/// Derive a 256-bit key from a passphrase.
///
/// Deliberately slow under the default parameters.
///
/// # Errors
///
/// Returns `CipherError::KeyDerivation` if the parameters or salt are rejected.
pub fn derive_key(passphrase: &str, salt: &[u8], params: &KdfParams) -> Result<SymmetricKey> {
    trace!(
        memory_kib = params.memory_kib,
        iterations = params.iterations,
        parallelism = params.parallelism,
        "deriving key"
    );

    let argon2 = params.argon2()?;
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut key[..])
        .map_err(|e| CipherError::KeyDerivation(format!("{}", e)))?;

    Ok(key)
}

/// Fresh random salt from the OS generator.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}
