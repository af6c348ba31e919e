//! Audit log types.
//!
//! An append-only record of every mutating store operation.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Kind of mutation recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    AddKeyCustodian,
    SetKeyCustodianPassphrase,
    RotateKeyCustodianKey,
    /// An owner's wrapping of a domain key was re-sealed for their new key.
    RewrapDomainKey,
    AddDomain,
    SetSecret,
    AddOwner,
    RotateDomainKey,
}

impl AuditAction {
    /// Stable snake_case name, as persisted.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddKeyCustodian => "add_key_custodian",
            Self::SetKeyCustodianPassphrase => "set_key_custodian_passphrase",
            Self::RotateKeyCustodianKey => "rotate_key_custodian_key",
            Self::RewrapDomainKey => "rewrap_domain_key",
            Self::AddDomain => "add_domain",
            Self::SetSecret => "set_secret",
            Self::AddOwner => "add_owner",
            Self::RotateDomainKey => "rotate_domain_key",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Position in the log, starting at 1.
    pub seq: u64,
    pub action: AuditAction,
    /// Acting user id, or `anonymous`.
    pub actor: String,
    /// What was acted on: a user id, a domain name, or `domain/secret`.
    pub target: String,
    pub at: DateTime<Utc>,
}

impl std::fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} {} by {} at {}",
            self.seq,
            self.action,
            self.target,
            self.actor,
            self.at.to_rfc3339()
        )
    }
}

/// Ordered, append-only sequence of audit entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditLog(Vec<AuditEntry>);

impl AuditLog {
    /// All entries, oldest first
    pub fn entries(&self) -> &[AuditEntry] {
        &self.0
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Most recent entry
    pub fn last(&self) -> Option<&AuditEntry> {
        self.0.last()
    }

    /// Append an entry with the next sequence number.
    pub(crate) fn append(&mut self, action: AuditAction, actor: &str, target: &str) {
        let seq = self.0.last().map_or(1, |e| e.seq + 1);
        self.0.push(AuditEntry {
            seq,
            action,
            actor: actor.to_string(),
            target: target.to_string(),
            at: Utc::now().trunc_subsecs(0),
        });
    }

    /// Sequence numbers must run 1, 2, 3, ... without gaps.
    pub(crate) fn validate(&self) -> Result<()> {
        for (i, entry) in self.0.iter().enumerate() {
            let expected = i as u64 + 1;
            if entry.seq != expected {
                return Err(StoreError::Invalid(format!(
                    "audit log out of sequence: expected #{}, found #{}",
                    expected, entry.seq
                ))
                .into());
            }
        }
        Ok(())
    }
}
