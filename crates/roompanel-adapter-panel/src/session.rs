//! Login on demand and retry once on session expiry.

use crate::endpoints::LOGIN_PATH;
use crate::error::PanelError;
use roompanel_adapter_http::{ClientError, RequestBody, Transport};
use std::fmt;
use std::future::Future;

/// Panel login credentials.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Login name
    pub username: String,
    /// Login password
    pub password: String,
}

impl Credentials {
    /// Create credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn login_form(&self) -> RequestBody {
        RequestBody::Form(vec![
            ("login".to_string(), self.username.clone()),
            ("passwd".to_string(), self.password.clone()),
        ])
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Owns the authenticate-on-demand policy around single requests.
///
/// The session itself (a cookie) lives in the transport; this type only
/// knows that a 403 means it is gone and that logging in renews it.
#[derive(Debug, Clone)]
pub struct SessionManager {
    credentials: Credentials,
}

impl SessionManager {
    /// Create a session manager for the given credentials.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Log in and let the transport record the new session.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Auth`] if the login request fails.
    pub async fn authenticate<T>(&self, transport: &T) -> Result<(), PanelError>
    where
        T: Transport + ?Sized,
    {
        tracing::debug!(username = %self.credentials.username, "Logging in to panel");

        transport
            .post(LOGIN_PATH, &self.credentials.login_form())
            .await
            .map_err(PanelError::Auth)?;

        Ok(())
    }

    /// Run `action`, logging in and retrying it once if the panel answers 403.
    ///
    /// Any other failure of the first attempt, and any failure of the retry,
    /// is returned as is. A second 403 is escalated to [`PanelError::Auth`].
    ///
    /// # Errors
    ///
    /// Returns error if the action fails for any reason other than a
    /// recoverable session expiry, or if the login fails.
    pub async fn with_session<T, F, Fut, R>(
        &self,
        transport: &T,
        mut action: F,
    ) -> Result<R, PanelError>
    where
        T: Transport + ?Sized,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, ClientError>>,
    {
        match action().await {
            Ok(response) => Ok(response),
            Err(e) if e.is_forbidden() => {
                tracing::warn!("Panel session expired or missing, logging in again");
                self.authenticate(transport).await?;

                action().await.map_err(|e| {
                    if e.is_forbidden() {
                        PanelError::Auth(e)
                    } else {
                        PanelError::Transport(e)
                    }
                })
            }
            Err(e) => Err(PanelError::Transport(e)),
        }
    }

    /// GET `path` within the session.
    ///
    /// # Errors
    ///
    /// See [`SessionManager::with_session`].
    pub async fn get<T>(&self, transport: &T, path: &str) -> Result<String, PanelError>
    where
        T: Transport + ?Sized,
    {
        self.with_session(transport, move || transport.get(path))
            .await
    }

    /// POST `body` to `path` within the session.
    ///
    /// # Errors
    ///
    /// See [`SessionManager::with_session`].
    pub async fn post<T>(
        &self,
        transport: &T,
        path: &str,
        body: &RequestBody,
    ) -> Result<String, PanelError>
    where
        T: Transport + ?Sized,
    {
        self.with_session(transport, move || transport.post(path, body))
            .await
    }
}
