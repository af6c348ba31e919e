//! Read-only listings.

use std::collections::{BTreeMap, BTreeSet};

use super::KeyFile;
use crate::core::types::{DomainName, SecretName};
use crate::error::Result;

impl KeyFile {
    /// All domain names, sorted
    pub fn domain_names(&self) -> Vec<&str> {
        self.domains.keys().map(String::as_str).collect()
    }

    /// All custodian user ids, sorted
    pub fn custodian_ids(&self) -> Vec<&str> {
        self.custodians.keys().map(String::as_str).collect()
    }

    /// Owners of a domain, sorted.
    ///
    /// # Errors
    ///
    /// Returns `KeyFileError::DomainNotFound` if the domain does not exist.
    pub fn owners(&self, domain_name: &str) -> Result<Vec<&str>> {
        Ok(self.require_domain(domain_name)?.owners().collect())
    }

    /// Domains whose owner set contains `user_id`
    pub fn domains_owned_by(&self, user_id: &str) -> Vec<&str> {
        self.domains
            .values()
            .filter(|d| d.is_owner(user_id))
            .map(|d| d.name())
            .collect()
    }

    /// Every secret name, mapped to the domains holding a secret of that name.
    pub fn secret_index(&self) -> BTreeMap<SecretName, BTreeSet<DomainName>> {
        let mut index: BTreeMap<SecretName, BTreeSet<DomainName>> = BTreeMap::new();
        for domain in self.domains.values() {
            for secret in domain.secret_names() {
                index
                    .entry(secret.to_string())
                    .or_default()
                    .insert(domain.name().to_string());
            }
        }
        index
    }

    /// Secret names per domain, for the domains `user_id` owns.
    pub fn secrets_accessible_by(&self, user_id: &str) -> BTreeMap<DomainName, Vec<SecretName>> {
        self.domains
            .values()
            .filter(|d| d.is_owner(user_id))
            .map(|d| {
                let names = d.secret_names().map(str::to_string).collect();
                (d.name().to_string(), names)
            })
            .collect()
    }
}
