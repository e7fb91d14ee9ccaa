//! reqwest-backed transport for a room booking panel.
//!
//! One client per panel. The client keeps a cookie store, so the session
//! established by the login page is replayed on every later request until
//! the panel rejects it.

use crate::reachability;
use crate::transport::{RequestBody, Transport};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use url::Url;

/// Panel transport configuration.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Panel host name or address, optionally with a port.
    ///
    /// A scheme, if present, is discarded: requests always use HTTPS.
    pub host: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Build the HTTPS base URL for a panel host.
///
/// # Errors
///
/// Returns [`ClientError::Init`] if the host is empty or not a valid authority.
///
/// # Examples
///
/// ```
/// use roompanel_adapter_http::base_url;
///
/// let url = base_url("http://panel.local:8443").unwrap();
/// assert_eq!(url.as_str(), "https://panel.local:8443/");
/// ```
pub fn base_url(host: &str) -> Result<Url, ClientError> {
    let host = host.trim();
    let authority = host
        .split_once("://")
        .map_or(host, |(_, rest)| rest)
        .trim_end_matches('/');

    if authority.is_empty() {
        return Err(ClientError::Init("panel host is empty".to_string()));
    }

    let url = Url::parse(&format!("https://{authority}/"))
        .map_err(|e| ClientError::Init(format!("invalid panel host {host:?}: {e}")))?;

    if url.path() != "/" {
        return Err(ClientError::Init(format!(
            "panel host {host:?} must not contain a path"
        )));
    }

    Ok(url)
}

/// HTTPS transport for one panel.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a new panel transport.
    ///
    /// # Errors
    ///
    /// Returns error if the host is invalid or the HTTP client cannot be created.
    pub fn new(config: HttpTransportConfig) -> Result<Self, ClientError> {
        let base_url = base_url(&config.host)?;

        // Panels ship self-signed certificates
        let client = Client::builder()
            .timeout(config.timeout)
            .use_rustls_tls()
            .danger_accept_invalid_certs(true)
            .cookie_store(true)
            .build()
            .map_err(|e| ClientError::Init(e.to_string()))?;

        tracing::debug!(base_url = %base_url, "Created panel transport");

        Ok(Self { client, base_url })
    }

    /// Base URL every request path is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::Request(format!("invalid path {path:?}: {e}")))
    }

    async fn send(request: RequestBuilder) -> Result<String, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::ApiError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<String, ClientError> {
        let url = self.url(path)?;
        tracing::debug!(%url, "GET");
        Self::send(self.client.get(url)).await
    }

    async fn post(&self, path: &str, body: &RequestBody) -> Result<String, ClientError> {
        let url = self.url(path)?;
        tracing::debug!(%url, ?body, "POST");

        let request = self.client.post(url);
        let request = match body {
            RequestBody::Form(pairs) => request.form(pairs),
            RequestBody::Json(value) => request.json(value),
        };
        Self::send(request).await
    }

    async fn ping(&self) -> Result<Duration, ClientError> {
        let host = self
            .base_url
            .host_str()
            .ok_or_else(|| ClientError::Request("panel URL has no host".to_string()))?;
        let port = self.base_url.port_or_known_default().unwrap_or(443);
        let host = host.trim_start_matches('[').trim_end_matches(']');

        reachability::ping(host, port, Duration::from_secs(5)).await
    }
}

/// Errors that can occur talking to the panel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Client initialization failed
    #[error("client init error: {0}")]
    Init(String),
    /// HTTP request failed
    #[error("request error: {0}")]
    Request(String),
    /// Panel returned an error status
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
}

impl ClientError {
    /// Whether the panel refused the request for lack of a valid session.
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::ApiError { status: 403, .. })
    }
}
