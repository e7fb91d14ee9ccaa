//! # Room Panel Core
//!
//! Pure building blocks for monitoring a room booking panel.
//!
//! This crate provides:
//! - A streaming JSON field extractor that keeps only whitelisted top-level keys
//! - The field whitelists of the panel's REST endpoints
//! - Calendar sync freshness evaluation in the panel's timezone
//! - The statistics snapshot and control affordance model handed to the platform

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod extract;
pub mod fields;
pub mod freshness;
pub mod snapshot;

pub use extract::{extract_fields, extract_first, FieldMap, FieldWhitelist, FormatError};
pub use freshness::{is_stale, is_syncing, FreshnessError};
pub use snapshot::{ControlKind, Statistics};
