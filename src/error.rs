//! Error types.
//!
//! Every failure the core can produce is a typed variant nested under
//! [`Error`]. The core never prints or exits; the CLI maps these to messages
//! and exit codes.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    KeyFile(#[from] KeyFileError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Trust-structure errors raised by store operations.
#[derive(Error, Debug)]
pub enum KeyFileError {
    #[error("key custodian already exists: {0}")]
    DuplicateCustodian(String),

    #[error("domain already exists: {0}")]
    DuplicateDomain(String),

    #[error("{user} is already an owner of domain {domain}")]
    DuplicateOwner { domain: String, user: String },

    #[error("unknown key custodian: {0}")]
    UnknownUser(String),

    #[error("domain not found: {0}")]
    DomainNotFound(String),

    /// Unknown user and wrong passphrase deliberately share this variant.
    #[error("invalid credentials for {0}")]
    InvalidCreds(String),

    #[error("{user} is not an owner of domain {domain}")]
    AccessDenied { domain: String, user: String },
}

/// Cryptographic failures. All of them fail closed.
#[derive(Error, Debug)]
pub enum CipherError {
    /// At-rest authenticated decryption failed (wrong key or tampered data).
    #[error("decryption failed")]
    Decryption,

    /// A sealed envelope could not be opened with the given private key.
    #[error("failed to unwrap sealed value: {0}")]
    Unwrap(String),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("armor encoding failed: {0}")]
    ArmorFailed(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid private key material")]
    InvalidPrivateKey,
}

/// Persistence errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed key file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("failed to serialize key file: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("invalid key file: {0}")]
    Invalid(String),

    #[error("unsupported key file format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// Input validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("invalid user id '{0}': expected an email address")]
    InvalidUserId(String),

    #[error("{0} cannot be empty")]
    EmptyName(&'static str),

    #[error("invalid {kind} '{name}': {reason}")]
    InvalidName {
        kind: &'static str,
        name: String,
        reason: String,
    },

    #[error("passphrase cannot be empty")]
    EmptyPassphrase,

    #[error("passphrases did not match")]
    PassphraseMismatch,
}

/// Runtime configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
