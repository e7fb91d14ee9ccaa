//! # Room Panel HTTP Adapter
//!
//! HTTPS transport for talking to a room booking panel's REST API.
//!
//! ## Transport Policy
//!
//! Fixed by the adapter, never negotiated by the caller:
//!
//! - **HTTPS only**: whatever scheme the operator configures, requests go to `https://<host>/`
//! - **No certificate validation**: panels ship self-signed certificates
//! - **Cookie sessions**: no `Authorization` header is ever sent; the session
//!   cookie set by the login page authenticates later requests

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod reachability;
pub mod transport;

pub use client::{base_url, ClientError, HttpTransport, HttpTransportConfig};
pub use reachability::ping;
pub use transport::{RequestBody, Transport};
