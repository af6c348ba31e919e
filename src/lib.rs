//! pocket-protector - team secrets in a single reviewable file.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── commands      # Command handlers
//! │   ├── prompt        # Terminal and scripted input
//! │   └── output        # Styled output
//! └── core/             # Core library components
//!     ├── cipher/       # Sealing, key derivation, at-rest encryption
//!     │   ├── age       # age x25519 sealed envelopes
//!     │   ├── kdf       # Argon2id
//!     │   └── at_rest   # ChaCha20-Poly1305
//!     ├── model/        # Custodians, domains, audit log, credentials
//!     ├── keyfile/      # The store and its operations
//!     ├── config        # Environment settings
//!     └── diff          # Line diffs for review before write
//! ```
//!
//! # Model
//!
//! - A key custodian is a person with an x25519 keypair; the private key is
//!   encrypted under their passphrase.
//! - A domain is a named group of secrets with its own keypair. Its private
//!   key is sealed once for each owner.
//! - Secrets are sealed to the domain public key, so anyone can write them
//!   and only owners can read them.
//! - Every change appends to an audit log stored in the same file.

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::keyfile::KeyFile;
pub use crate::core::model::{AuditAction, AuditEntry, Creds, Domain, KeyCustodian};
pub use crate::error::{Error, Result};
