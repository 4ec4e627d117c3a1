//! Store error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP transport error (connect, timeout, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Local cache I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The record key cannot be used as a file name or URL segment.
    #[error("Invalid record key: {0}")]
    InvalidKey(String),

    /// The tier is switched off (in-process stores only).
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// True when sending the same record again cannot succeed: a 4xx other
    /// than 408 and 429, or a key the backend cannot address.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        match self {
            Self::Api { status, .. } => {
                matches!(*status, 400..=499) && *status != 408 && *status != 429
            }
            Self::InvalidKey(_) => true,
            Self::Http(_) | Self::Io(_) | Self::Serialization(_) | Self::Unavailable(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> StoreError {
        StoreError::Api {
            status,
            message: String::new(),
        }
    }

    #[test]
    fn client_errors_are_permanent() {
        assert!(api(400).is_permanent());
        assert!(api(422).is_permanent());
        assert!(StoreError::InvalidKey("x".into()).is_permanent());
    }

    #[test]
    fn timeouts_throttling_and_outages_are_retried() {
        assert!(!api(408).is_permanent());
        assert!(!api(429).is_permanent());
        assert!(!api(503).is_permanent());
        assert!(!StoreError::Unavailable("off".into()).is_permanent());
    }
}
