//! Canonical serialization and atomic persistence.
//!
//! The document is YAML with a leading `format_version`. Maps are `BTreeMap`s
//! so the same store always serializes to the same bytes, which keeps
//! `--confirm-diff` output limited to real changes.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::KeyFile;
use crate::core::cipher::KdfParams;
use crate::core::constants::FORMAT_VERSION;
use crate::core::model::{AuditLog, Domain, KeyCustodian};
use crate::core::types::{DomainName, UserId};
use crate::error::{Result, StoreError};

/// Borrowed view used for writing.
#[derive(Serialize)]
struct DocumentRef<'a> {
    format_version: u32,
    key_custodians: &'a BTreeMap<UserId, KeyCustodian>,
    domains: &'a BTreeMap<DomainName, Domain>,
    audit_log: &'a AuditLog,
}

/// Owned form used for reading. `format_version` is checked on the raw
/// value before this is built.
#[derive(Deserialize)]
struct Document {
    #[serde(default)]
    key_custodians: BTreeMap<UserId, KeyCustodian>,
    #[serde(default)]
    domains: BTreeMap<DomainName, Domain>,
    #[serde(default)]
    audit_log: AuditLog,
}

impl KeyFile {
    /// Load and validate a store.
    ///
    /// A file holding only whitespace is an empty store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the file does not exist,
    /// `StoreError::Parse` for malformed YAML, `StoreError::Invalid` if the
    /// document breaks a structural invariant, and
    /// `StoreError::UnsupportedVersion` for an unknown `format_version`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<KeyFile> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(path.to_path_buf()),
            _ => StoreError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let kf = Self::from_contents(path, &contents)?;
        debug!(
            path = %path.display(),
            custodians = kf.custodians.len(),
            domains = kf.domains.len(),
            "key file loaded"
        );
        Ok(kf)
    }

    /// Parse a store from text, binding it to `path`.
    ///
    /// # Errors
    ///
    /// Same as [`KeyFile::from_file`], minus the I/O cases.
    pub fn from_contents(path: impl Into<PathBuf>, contents: &str) -> Result<KeyFile> {
        let mut kf = KeyFile::new(path);
        if contents.trim().is_empty() {
            return Ok(kf);
        }

        let value: serde_yaml::Value = serde_yaml::from_str(contents).map_err(StoreError::Parse)?;
        check_version(&value)?;
        let doc: Document = serde_yaml::from_value(value).map_err(StoreError::Parse)?;

        kf.custodians = doc.key_custodians;
        kf.domains = doc.domains;
        kf.audit_log = doc.audit_log;
        kf.validate()?;
        Ok(kf)
    }

    /// Canonical YAML form of the store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialize` if serialization fails.
    pub fn get_contents(&self) -> Result<String> {
        let doc = DocumentRef {
            format_version: FORMAT_VERSION,
            key_custodians: &self.custodians,
            domains: &self.domains,
            audit_log: &self.audit_log,
        };
        Ok(serde_yaml::to_string(&doc).map_err(StoreError::Serialize)?)
    }

    /// Atomically replace the file at [`KeyFile::path`] with this store.
    ///
    /// The new contents go to a temporary file in the same directory, which
    /// is synced and renamed over the target. A failure before the rename
    /// leaves the previous file untouched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteFailed` on any I/O failure.
    pub fn write(&self) -> Result<()> {
        let contents = self.get_contents()?;
        let path = self.path.as_path();
        let write_failed = |source: io::Error| StoreError::WriteFailed {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_failed)?;
        tmp.write_all(contents.as_bytes()).map_err(write_failed)?;
        tmp.as_file().sync_all().map_err(write_failed)?;

        if let Ok(meta) = fs::metadata(path) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(write_failed)?;
        }

        tmp.persist(path).map_err(|e| write_failed(e.error))?;
        sync_dir(dir);

        info!(path = %path.display(), bytes = contents.len(), "key file written");
        Ok(())
    }

    /// Structural invariants every loaded store must satisfy.
    fn validate(&self) -> Result<()> {
        for (user_id, custodian) in &self.custodians {
            if user_id != custodian.user_id() {
                return Err(StoreError::Invalid(format!(
                    "custodian entry {} holds record for {}",
                    user_id,
                    custodian.user_id()
                ))
                .into());
            }
            custodian.validate()?;
        }

        for (name, domain) in &self.domains {
            if name != domain.name() {
                return Err(StoreError::Invalid(format!(
                    "domain entry {} holds record for {}",
                    name,
                    domain.name()
                ))
                .into());
            }
            domain.validate()?;
            if let Some(owner) = domain.owners().find(|o| !self.custodians.contains_key(*o)) {
                return Err(StoreError::Invalid(format!(
                    "domain {} is owned by unregistered user {}",
                    name, owner
                ))
                .into());
            }
        }

        self.audit_log.validate()
    }

    /// Load with caller-chosen KDF parameters for fresh derivations.
    pub fn from_file_with(path: impl AsRef<Path>, params: KdfParams) -> Result<KeyFile> {
        Ok(Self::from_file(path)?.with_kdf_params(params))
    }
}

fn check_version(value: &serde_yaml::Value) -> Result<()> {
    let raw = value
        .get("format_version")
        .ok_or_else(|| StoreError::Invalid("missing format_version".to_string()))?;
    let found = raw.as_u64().ok_or_else(|| {
        let shown = serde_yaml::to_string(raw).unwrap_or_default();
        StoreError::Invalid(format!(
            "format_version must be an unsigned integer, found {}",
            shown.trim()
        ))
    })?;

    if found != u64::from(FORMAT_VERSION) {
        return Err(StoreError::UnsupportedVersion {
            found: u32::try_from(found).unwrap_or(u32::MAX),
            supported: FORMAT_VERSION,
        }
        .into());
    }
    Ok(())
}

#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = fs::File::open(dir).and_then(|d| d.sync_all()) {
        warn!(dir = %dir.display(), error = %e, "directory sync failed");
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}
