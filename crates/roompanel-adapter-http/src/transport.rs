//! Transport capability the device logic is written against.

use crate::client::ClientError;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Body of a POST request.
#[derive(Clone, PartialEq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` pairs
    Form(Vec<(String, String)>),
    /// `application/json` document
    Json(Value),
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Form bodies carry credentials
            Self::Form(pairs) => f
                .debug_tuple("Form")
                .field(&pairs.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>())
                .finish(),
            Self::Json(value) => f.debug_tuple("Json").field(value).finish(),
        }
    }
}

/// Request primitives against one panel, relative to its base URL.
///
/// Session state (cookies) lives inside the implementation and is opaque to
/// callers.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` and return the response body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ApiError`] for non-success statuses and
    /// [`ClientError::Request`] for network failures.
    async fn get(&self, path: &str) -> Result<String, ClientError>;

    /// POST `body` to `path` and return the response body.
    ///
    /// # Errors
    ///
    /// Same as [`Transport::get`].
    async fn post(&self, path: &str, body: &RequestBody) -> Result<String, ClientError>;

    /// Measure how long it takes to reach the panel.
    ///
    /// # Errors
    ///
    /// Returns error if the panel cannot be reached.
    async fn ping(&self) -> Result<Duration, ClientError>;
}
