//! Session ID generation and validation.
//!
//! Generated IDs have the form `asm-{8 hex chars}`. Client-supplied IDs are
//! accepted as long as they are safe to use as a file name and a URL path
//! segment.

use crate::errors::CoreError;

/// Prefix for generated assessment session IDs.
pub const PREFIX_SESSION: &str = "asm";

/// Longest accepted session ID.
pub const MAX_SESSION_ID_LEN: usize = 64;

/// Generate a fresh session ID: `asm-` followed by 8 random hex characters.
///
/// # Errors
///
/// Returns [`CoreError::Other`] if the OS random source is unavailable.
pub fn generate_session_id() -> Result<String, CoreError> {
    let mut bytes = [0u8; 4];
    getrandom::fill(&mut bytes)
        .map_err(|e| CoreError::Other(anyhow::anyhow!("random source unavailable: {e}")))?;
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format!("{PREFIX_SESSION}-{hex}"))
}

/// Check that a session ID is 1 to 64 characters of `[A-Za-z0-9_-]`.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] describing the first violated rule.
pub fn validate_session_id(id: &str) -> Result<(), CoreError> {
    if id.is_empty() {
        return Err(CoreError::Validation("session id must not be empty".into()));
    }
    if id.len() > MAX_SESSION_ID_LEN {
        return Err(CoreError::Validation(format!(
            "session id longer than {MAX_SESSION_ID_LEN} characters"
        )));
    }
    if let Some(bad) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(CoreError::Validation(format!(
            "session id contains invalid character {bad:?}"
        )));
    }
    Ok(())
}
