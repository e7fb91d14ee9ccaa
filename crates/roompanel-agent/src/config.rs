//! Agent configuration.

use anyhow::{Context, Result};
use roompanel_adapter_http::HttpTransportConfig;
use roompanel_adapter_panel::Credentials;
use std::time::Duration;

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Panel connection configuration
    pub panel: PanelConfig,

    /// Interval between statistics polls
    pub poll_interval: Duration,
}

/// Panel connection configuration.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Panel host name or address
    pub host: String,

    /// Login credentials
    pub credentials: Credentials,

    /// Request timeout
    pub timeout: Duration,
}

impl PanelConfig {
    /// Transport configuration for this panel.
    pub fn transport(&self) -> HttpTransportConfig {
        HttpTransportConfig {
            host: self.host.clone(),
            timeout: self.timeout,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            panel: PanelConfig {
                host: "localhost".to_string(),
                credentials: Credentials::default(),
                timeout: Duration::from_secs(30),
            },
            poll_interval: Duration::from_secs(60),
        }
    }
}

impl AgentConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ROOMPANEL_HOST`: Panel host (required)
    /// - `ROOMPANEL_USERNAME`: Login name
    /// - `ROOMPANEL_PASSWORD`: Login password
    /// - `ROOMPANEL_POLL_INTERVAL_SECS`: Seconds between polls (default 60)
    /// - `ROOMPANEL_TIMEOUT_SECS`: Request timeout in seconds (default 30)
    ///
    /// # Errors
    ///
    /// Returns error if the host is missing or a number is invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        config.panel.host = lookup("ROOMPANEL_HOST")
            .filter(|host| !host.trim().is_empty())
            .context("ROOMPANEL_HOST must be set")?;

        if let Some(username) = lookup("ROOMPANEL_USERNAME") {
            config.panel.credentials.username = username;
        }

        if let Some(password) = lookup("ROOMPANEL_PASSWORD") {
            config.panel.credentials.password = password;
        }

        if let Some(secs) = lookup("ROOMPANEL_POLL_INTERVAL_SECS") {
            config.poll_interval = parse_secs(&secs).context("Invalid ROOMPANEL_POLL_INTERVAL_SECS")?;
        }

        if let Some(secs) = lookup("ROOMPANEL_TIMEOUT_SECS") {
            config.panel.timeout = parse_secs(&secs).context("Invalid ROOMPANEL_TIMEOUT_SECS")?;
        }

        Ok(config)
    }
}

fn parse_secs(value: &str) -> Result<Duration> {
    let secs: u64 = value.trim().parse()?;
    anyhow::ensure!(secs > 0, "must be greater than zero");
    Ok(Duration::from_secs(secs))
}
