//! Input validation for store operations.
//!
//! Validates user ids, domain and secret names, and passphrases.

use crate::error::{Result, ValidationError};

/// Validate a key custodian user id.
///
/// User ids are email-shaped:
/// - Exactly one `@`
/// - Non-empty local part and domain part
/// - No whitespace or control characters
///
/// # Errors
///
/// Returns `ValidationError::InvalidUserId` if the id is malformed.
pub fn validate_user_id(user_id: &str) -> Result<()> {
    let invalid = || ValidationError::InvalidUserId(user_id.to_string());

    if user_id
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(invalid().into());
    }

    let mut parts = user_id.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(invalid().into()),
    }
}

/// Validate a domain or secret name.
///
/// Names cannot be empty, cannot carry surrounding whitespace, and cannot
/// contain control characters.
///
/// # Arguments
///
/// * `kind` - What is being named ("domain name", "secret name"), for messages
/// * `name` - The name to validate
///
/// # Errors
///
/// Returns `ValidationError` if the name is invalid.
pub fn validate_name(kind: &'static str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName(kind).into());
    }

    if name.trim() != name {
        return Err(ValidationError::InvalidName {
            kind,
            name: name.to_string(),
            reason: "leading or trailing whitespace".to_string(),
        }
        .into());
    }

    if let Some((i, ch)) = name.chars().enumerate().find(|(_, c)| c.is_control()) {
        return Err(ValidationError::InvalidName {
            kind,
            name: name.escape_debug().to_string(),
            reason: format!("control character {:?} at position {}", ch, i + 1),
        }
        .into());
    }

    Ok(())
}

/// Validate a passphrase. Passphrases cannot be empty.
pub fn validate_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.is_empty() {
        return Err(ValidationError::EmptyPassphrase.into());
    }
    Ok(())
}
