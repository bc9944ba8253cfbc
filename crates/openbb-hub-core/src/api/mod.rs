//! HTTP plumbing for the OpenBB Hub.
//!
//! The session bridge talks to the hub through the `HubTransport` trait.
//! `HubClient` is the production implementation on top of reqwest; tests
//! plug in their own transport.

pub mod client;
pub mod error;
pub mod transport;

pub use client::HubClient;
pub use error::{HubError, Result};
pub use transport::{HubRequest, HubResponse, HubTransport};
