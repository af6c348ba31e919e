//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

use std::collections::BTreeMap;

use zeroize::Zeroizing;

/// A key custodian's user id (email-shaped).
pub type UserId = String;

/// A domain name.
pub type DomainName = String;

/// A secret name within a domain.
pub type SecretName = String;

/// An age x25519 public key string (starts with "age1...").
pub type PublicKey = String;

/// An age-armored sealed value.
///
/// Either a domain private key sealed for an owner, or a secret value sealed
/// for a domain.
pub type SealedValue = String;

/// Decrypted secrets of one domain, keyed by secret name.
pub type Plaintexts = BTreeMap<SecretName, Zeroizing<String>>;
