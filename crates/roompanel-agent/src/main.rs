//! # Room Panel Agent
//!
//! Long-running monitor for a single room booking panel.
//!
//! ## Loops
//!
//! 1. **Polling**: collects a statistics snapshot every poll interval and logs it
//! 2. **Control**: reads control batches from stdin (`reboot`, or
//!    `name=value` pairs separated by commas) and dispatches them best effort

use anyhow::Result;
use tracing_subscriber::EnvFilter;

mod config;
mod runtime;

use config::AgentConfig;
use runtime::Agent;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting room panel agent"
    );

    let config = AgentConfig::from_env()?;
    tracing::info!(host = %config.panel.host, "Agent configured");

    let agent = Agent::new(config)?;
    agent.run().await?;

    Ok(())
}
