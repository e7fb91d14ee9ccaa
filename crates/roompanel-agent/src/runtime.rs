//! Agent runtime orchestration.

use crate::config::AgentConfig;
use anyhow::{Context, Result};
use roompanel_adapter_http::HttpTransport;
use roompanel_adapter_panel::{ControlOutcome, ControlReport, ControlRequest, PanelPoller, RoomPanel};
use roompanel_core::fields::PANEL_SYNCING;
use roompanel_core::Statistics;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// The main agent runtime.
pub struct Agent {
    config: AgentConfig,
    panel: Arc<RoomPanel<HttpTransport>>,
}

impl Agent {
    /// Create a new agent.
    ///
    /// # Errors
    ///
    /// Returns error if the panel transport cannot be created.
    pub fn new(config: AgentConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.panel.transport())
            .context("Failed to create panel transport")?;
        let panel = Arc::new(RoomPanel::new(
            transport,
            config.panel.credentials.clone(),
        ));

        Ok(Self { config, panel })
    }

    /// Run the agent's main loop until Ctrl+C.
    ///
    /// # Errors
    ///
    /// Returns error if the runtime cannot be driven.
    pub async fn run(self) -> Result<()> {
        tracing::info!("Starting agent runtime");

        match self.panel.ping().await {
            Ok(rtt) => tracing::info!(rtt_ms = rtt.as_millis(), "Panel reachable"),
            Err(e) => tracing::warn!(error = %e, "Panel not reachable yet"),
        }

        let mut snapshots =
            PanelPoller::new(Arc::clone(&self.panel), self.config.poll_interval).start();
        let mut controls = spawn_control_reader();

        tracing::info!("Agent running, press Ctrl+C to stop");

        loop {
            tokio::select! {
                Some(stats) = snapshots.recv() => {
                    log_snapshot(&stats);
                }

                Some(batch) = controls.recv() => {
                    let report = self.panel.dispatch_all(&batch).await;
                    log_report(&report);
                }

                // Handle shutdown
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received");
                    break;
                }
            }
        }

        tracing::info!("Agent stopped");
        Ok(())
    }
}

/// Forward each non-empty stdin line as a control batch.
fn spawn_control_reader() -> mpsc::Receiver<Vec<ControlRequest>> {
    let (tx, rx) = mpsc::channel(8);

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let batch = parse_control_line(&line);
                    if batch.is_empty() {
                        continue;
                    }
                    if tx.send(batch).await.is_err() {
                        return;
                    }
                }
                Ok(None) => {
                    tracing::debug!("Control input closed");
                    return;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read control input");
                    return;
                }
            }
        }
    });

    rx
}

/// Parse `name[=value]` entries separated by commas.
fn parse_control_line(line: &str) -> Vec<ControlRequest> {
    line.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((name, value)) => ControlRequest::new(name.trim()).with_value(value.trim()),
            None => ControlRequest::new(entry),
        })
        .collect()
}

fn log_snapshot(stats: &Statistics) {
    let fields = serde_json::to_string(&stats.statistics).unwrap_or_default();
    tracing::info!(
        syncing = stats.get(PANEL_SYNCING).unwrap_or("unknown"),
        state = stats.get("State").unwrap_or("unknown"),
        fields = %fields,
        "Panel snapshot"
    );
}

fn log_report(report: &ControlReport) {
    for (property, outcome) in &report.entries {
        match outcome {
            ControlOutcome::Applied => tracing::info!(property, "Control applied"),
            ControlOutcome::Ignored => tracing::info!(property, "Control ignored"),
            ControlOutcome::SoftFailure { response } => {
                tracing::warn!(property, response, "Control not confirmed by panel");
            }
            ControlOutcome::Failed(e) => tracing::warn!(property, error = %e, "Control failed"),
        }
    }
}
