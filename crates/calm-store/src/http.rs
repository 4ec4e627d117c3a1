//! Shared HTTP response helpers for the remote store.

use crate::error::StoreError;

/// Map a non-success response to [`StoreError::Api`] carrying the body.
///
/// # Errors
///
/// Returns [`StoreError::Api`] for any non-2xx status.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    if !resp.status().is_success() {
        return Err(StoreError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}
