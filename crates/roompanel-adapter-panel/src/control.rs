//! Control dispatch.
//!
//! A single control either applies, soft-fails (the panel answered without
//! the success marker, typically because it is already going down), is
//! ignored (unknown name), or fails outright. Batches never stop early: the
//! outcome of every request lands in a [`ControlReport`].

use crate::endpoints::{reboot_command, DEVICE_OPERATIONS_PATH, OPERATION_SUCCESS_MARKER};
use crate::error::PanelError;
use crate::session::SessionManager;
use roompanel_adapter_http::{RequestBody, Transport};
use roompanel_core::fields::REBOOT;

/// Control invocation from the monitoring platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlRequest {
    /// Control name
    pub property: String,
    /// Optional value, unused by push controls
    pub value: Option<String>,
}

impl ControlRequest {
    /// Request a control without a value.
    #[must_use]
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: None,
        }
    }

    /// Attach a value to the request.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl From<&str> for ControlRequest {
    fn from(property: &str) -> Self {
        Self::new(property)
    }
}

/// Device actions the panel supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Restart the panel
    Reboot,
}

impl Control {
    /// Resolve a control name, ignoring ASCII case.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        name.eq_ignore_ascii_case(REBOOT).then_some(Self::Reboot)
    }

    fn command(self) -> RequestBody {
        match self {
            Self::Reboot => RequestBody::Json(reboot_command()),
        }
    }
}

/// Outcome of one control request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlOutcome {
    /// Panel confirmed the action
    Applied,
    /// Panel answered without confirming
    SoftFailure {
        /// Response body as received
        response: String,
    },
    /// Name did not match any control
    Ignored,
    /// Request could not be delivered
    Failed(PanelError),
}

impl ControlOutcome {
    /// Whether the control was applied or deliberately ignored.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Applied | Self::Ignored)
    }
}

/// Per-request outcomes of a control batch, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlReport {
    /// Control name and its outcome
    pub entries: Vec<(String, ControlOutcome)>,
}

impl ControlReport {
    /// Entries that soft-failed or failed.
    pub fn failures(&self) -> impl Iterator<Item = &(String, ControlOutcome)> {
        self.entries.iter().filter(|(_, outcome)| !outcome.is_ok())
    }

    /// Whether every request applied or was ignored.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Dispatch a single control.
///
/// # Errors
///
/// Returns error if the command cannot be delivered. A delivered command the
/// panel does not confirm is [`ControlOutcome::SoftFailure`], not an error.
pub async fn dispatch<T>(
    transport: &T,
    session: &SessionManager,
    request: &ControlRequest,
) -> Result<ControlOutcome, PanelError>
where
    T: Transport + ?Sized,
{
    let Some(control) = Control::parse(&request.property) else {
        tracing::debug!(property = %request.property, "Ignoring unknown control");
        return Ok(ControlOutcome::Ignored);
    };

    tracing::info!(?control, "Sending control to panel");

    let response = session
        .post(transport, DEVICE_OPERATIONS_PATH, &control.command())
        .await?;

    if response.contains(OPERATION_SUCCESS_MARKER) {
        Ok(ControlOutcome::Applied)
    } else {
        tracing::error!(?control, %response, "Panel did not confirm control");
        Ok(ControlOutcome::SoftFailure { response })
    }
}

/// Dispatch every request in order, whatever happens to the others.
pub async fn dispatch_all<T>(
    transport: &T,
    session: &SessionManager,
    requests: &[ControlRequest],
) -> ControlReport
where
    T: Transport + ?Sized,
{
    let mut report = ControlReport::default();

    for request in requests {
        let outcome = match dispatch(transport, session, request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(property = %request.property, error = %e, "Control failed");
                ControlOutcome::Failed(e)
            }
        };
        report.entries.push((request.property.clone(), outcome));
    }

    report
}
