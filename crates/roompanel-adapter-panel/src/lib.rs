//! # Room Panel Adapter
//!
//! Monitoring and control of a single room booking panel.
//!
//! ## Sessions
//!
//! The panel authenticates with a cookie issued by its login page. Every
//! request runs through the [`SessionManager`]: a `403 Forbidden` triggers one
//! login and one retry of that same request, nothing more.
//!
//! ## Statistics
//!
//! A poll fetches three endpoints strictly in order and merges a fixed set of
//! fields from each into one [`Statistics`](roompanel_core::Statistics)
//! snapshot. Any hard failure aborts the poll; partial snapshots are never
//! returned.
//!
//! ## Controls
//!
//! Controls are best effort. A batch always attempts every request and
//! reports the outcome of each one instead of failing.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod control;
pub mod endpoints;
pub mod error;
pub mod panel;
pub mod poller;
pub mod session;
pub mod stats;

#[cfg(test)]
pub(crate) mod mock;

pub use control::{Control, ControlOutcome, ControlReport, ControlRequest};
pub use error::PanelError;
pub use panel::RoomPanel;
pub use poller::PanelPoller;
pub use session::{Credentials, SessionManager};
