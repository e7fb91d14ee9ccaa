//! Panel adapter errors.

use roompanel_adapter_http::ClientError;
use roompanel_core::{FormatError, FreshnessError};

/// Errors that abort a poll or a single control.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PanelError {
    /// Login failed, or the panel still refused the session after a fresh login
    #[error("authentication failed: {0}")]
    Auth(#[source] ClientError),
    /// Network failure or unexpected status
    #[error("transport error: {0}")]
    Transport(#[source] ClientError),
    /// Response body was not the JSON object expected
    #[error("unexpected response from {path}: {source}")]
    Format {
        /// Endpoint that returned the body
        path: &'static str,
        /// Underlying format failure
        source: FormatError,
    },
    /// Calendar sync timestamp could not be evaluated
    #[error("calendar sync status: {0}")]
    Freshness(#[from] FreshnessError),
}
