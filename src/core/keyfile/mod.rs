//! The key file: root aggregate of custodians, domains and the audit log.
//!
//! A [`KeyFile`] is an immutable snapshot. Every mutating operation borrows
//! the current snapshot and returns a new one, so the caller can diff the two
//! serialized forms before committing:
//!
//! ```no_run
//! use pocket_protector::KeyFile;
//!
//! let kf = KeyFile::from_file("protected.yaml")?;
//! let next = kf.set_secret("prod", "db_pass", "s3cr3t")?;
//! println!("{}", next.get_contents()?);
//! next.write()?;
//! # Ok::<(), pocket_protector::error::Error>(())
//! ```
//!
//! Operations are split by concern:
//! - `custodians`: issuing identities, passphrase changes, key rotation
//! - `verify`: credential checks
//! - `domains`: domains, secrets, owners, domain key rotation
//! - `persist`: canonical serialization and atomic writes
//! - `queries`: read-only listings

mod custodians;
mod domains;
mod persist;
mod queries;
mod verify;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::cipher::KdfParams;
use crate::core::model::{AuditLog, Domain, KeyCustodian};
use crate::core::types::{DomainName, UserId};
use crate::error::{KeyFileError, Result};

/// A snapshot of the whole store, bound to a file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFile {
    path: PathBuf,
    custodians: BTreeMap<UserId, KeyCustodian>,
    domains: BTreeMap<DomainName, Domain>,
    audit_log: AuditLog,
    /// Parameters for derivations performed by this process. Not persisted;
    /// each custodian records the parameters its key was protected with.
    kdf_params: KdfParams,
}

impl KeyFile {
    /// An empty store bound to `path`. Nothing is written until [`KeyFile::write`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            custodians: BTreeMap::new(),
            domains: BTreeMap::new(),
            audit_log: AuditLog::default(),
            kdf_params: KdfParams::default(),
        }
    }

    /// Use `params` for every key derivation this snapshot and its successors
    /// perform when protecting a key.
    pub fn with_kdf_params(mut self, params: KdfParams) -> Self {
        self.kdf_params = params;
        self
    }

    /// File path this store is bound to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Derivation parameters for newly protected keys
    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf_params
    }

    /// The audit log
    pub fn audit_log(&self) -> &AuditLog {
        &self.audit_log
    }

    /// Look up a custodian
    pub fn custodian(&self, user_id: &str) -> Option<&KeyCustodian> {
        self.custodians.get(user_id)
    }

    /// Look up a domain
    pub fn domain(&self, name: &str) -> Option<&Domain> {
        self.domains.get(name)
    }

    fn require_domain(&self, name: &str) -> Result<&Domain> {
        self.domains
            .get(name)
            .ok_or_else(|| KeyFileError::DomainNotFound(name.to_string()).into())
    }

    fn require_custodian(&self, user_id: &str) -> Result<&KeyCustodian> {
        self.custodians
            .get(user_id)
            .ok_or_else(|| KeyFileError::UnknownUser(user_id.to_string()).into())
    }
}
