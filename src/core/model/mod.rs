//! Model types.
//!
//! Value types making up a store: credentials, custodians, domains and the
//! audit log.

pub mod audit;
mod creds;
mod custodian;
mod domain;

pub use audit::{AuditAction, AuditEntry, AuditLog};
pub use creds::Creds;
pub use custodian::KeyCustodian;
pub use domain::Domain;
