//! Periodic statistics polling.

use crate::panel::RoomPanel;
use roompanel_adapter_http::Transport;
use roompanel_core::Statistics;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Collects a snapshot from one panel on a fixed interval.
pub struct PanelPoller<T> {
    panel: Arc<RoomPanel<T>>,
    poll_interval: Duration,
}

impl<T: Transport + 'static> PanelPoller<T> {
    /// Create a poller for a shared panel.
    #[must_use]
    pub fn new(panel: Arc<RoomPanel<T>>, poll_interval: Duration) -> Self {
        Self {
            panel,
            poll_interval,
        }
    }

    /// Start polling and return a channel of snapshots.
    ///
    /// The first poll runs immediately. Failed polls are logged and produce
    /// nothing. Polling stops once the receiver is dropped.
    #[must_use]
    pub fn start(self) -> mpsc::Receiver<Statistics> {
        let (tx, rx) = mpsc::channel(16);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;

                    () = tx.closed() => break,
                    _ = ticker.tick() => {}
                }

                match self.panel.collect().await {
                    Ok(stats) => {
                        if tx.send(stats).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Poll failed");
                    }
                }
            }

            tracing::debug!("Snapshot receiver dropped, stopping poller");
        });

        rx
    }
}
