//! Device facade for one panel.

use crate::control::{self, ControlOutcome, ControlReport, ControlRequest};
use crate::error::PanelError;
use crate::session::{Credentials, SessionManager};
use crate::stats;
use chrono::{DateTime, Utc};
use roompanel_adapter_http::Transport;
use roompanel_core::Statistics;
use std::time::Duration;
use tokio::sync::Mutex;

/// One room booking panel, reached through `T`.
///
/// Polls and controls share the panel's session, so they are serialized:
/// each call holds the panel lock until it completes.
pub struct RoomPanel<T> {
    transport: T,
    session: SessionManager,
    lock: Mutex<()>,
}

impl<T: Transport> RoomPanel<T> {
    /// Create a panel from a transport and login credentials.
    #[must_use]
    pub fn new(transport: T, credentials: Credentials) -> Self {
        Self {
            transport,
            session: SessionManager::new(credentials),
            lock: Mutex::new(()),
        }
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Log in ahead of the first request.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Auth`] if the login fails.
    pub async fn authenticate(&self) -> Result<(), PanelError> {
        let _guard = self.lock.lock().await;
        self.session.authenticate(&self.transport).await
    }

    /// Collect a statistics snapshot.
    ///
    /// # Errors
    ///
    /// See [`stats::collect`].
    pub async fn collect(&self) -> Result<Statistics, PanelError> {
        let _guard = self.lock.lock().await;
        stats::collect(&self.transport, &self.session, Utc::now()).await
    }

    /// Collect a statistics snapshot, judging sync freshness at `now`.
    ///
    /// # Errors
    ///
    /// See [`stats::collect`].
    pub async fn collect_at(&self, now: DateTime<Utc>) -> Result<Statistics, PanelError> {
        let _guard = self.lock.lock().await;
        stats::collect(&self.transport, &self.session, now).await
    }

    /// Dispatch one control.
    ///
    /// # Errors
    ///
    /// See [`control::dispatch`].
    pub async fn dispatch(&self, request: &ControlRequest) -> Result<ControlOutcome, PanelError> {
        let _guard = self.lock.lock().await;
        control::dispatch(&self.transport, &self.session, request).await
    }

    /// Dispatch a batch of controls, holding the panel for the whole batch.
    pub async fn dispatch_all(&self, requests: &[ControlRequest]) -> ControlReport {
        let _guard = self.lock.lock().await;
        control::dispatch_all(&self.transport, &self.session, requests).await
    }

    /// Measure round trip time to the panel.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Transport`] if the panel is unreachable.
    pub async fn ping(&self) -> Result<Duration, PanelError> {
        self.transport.ping().await.map_err(PanelError::Transport)
    }
}
