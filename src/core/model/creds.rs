//! Credentials type.
//!
//! A user id and passphrase pair that lives for a single operation call.

use zeroize::Zeroizing;

use crate::core::types::UserId;

/// User credentials. Never persisted.
///
/// The passphrase is wiped on drop and never shown by `Debug`.
#[derive(Clone)]
pub struct Creds {
    user_id: UserId,
    passphrase: Zeroizing<String>,
}

impl Creds {
    /// Create credentials from a user id and passphrase
    pub fn new(user_id: impl Into<UserId>, passphrase: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            passphrase: Zeroizing::new(passphrase.into()),
        }
    }

    /// The claimed user id
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The passphrase
    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }
}

impl std::fmt::Debug for Creds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Creds")
            .field("user_id", &self.user_id)
            .field("passphrase", &"<redacted>")
            .finish()
    }
}
