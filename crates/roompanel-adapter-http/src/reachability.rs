//! TCP reachability check.

use crate::client::ClientError;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;

/// Time a TCP connect to `host:port`.
///
/// # Errors
///
/// Returns [`ClientError::Request`] if the connection is refused or does not
/// complete within `timeout`.
pub async fn ping(host: &str, port: u16, timeout: Duration) -> Result<Duration, ClientError> {
    let started = Instant::now();

    let stream = tokio::time::timeout(timeout, TcpStream::connect((host, port)))
        .await
        .map_err(|_| ClientError::Request(format!("connect to {host}:{port} timed out")))?
        .map_err(|e| ClientError::Request(format!("connect to {host}:{port}: {e}")))?;
    let elapsed = started.elapsed();
    drop(stream);

    tracing::debug!(host, port, elapsed_ms = elapsed.as_millis(), "Ping");
    Ok(elapsed)
}
