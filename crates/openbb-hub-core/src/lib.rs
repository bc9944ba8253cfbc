//! Client library for the OpenBB Hub.
//!
//! The hub holds a user's account and settings. This crate logs in to it,
//! keeps the resulting session, and syncs provider API keys between the
//! hub's naming convention and the local one.
//!
//! ```no_run
//! # async fn run() -> openbb_hub_core::Result<()> {
//! use openbb_hub_core::{HubConfig, SessionBridge};
//!
//! let mut bridge = SessionBridge::from_config(HubConfig::from_env())?;
//! bridge.connect(Some("me@example.com"), Some("password"), None).await?;
//! let credentials = bridge.pull_credentials().await?;
//! println!("{}", credentials);
//! bridge.disconnect().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod bridge;
pub mod config;
pub mod keymap;
pub mod models;

pub use api::{HubClient, HubError, HubRequest, HubResponse, HubTransport, Result};
pub use auth::{Credentials, Session, TokenClaims};
pub use bridge::SessionBridge;
pub use config::HubConfig;
pub use keymap::KeyMap;
pub use models::{Chart, ChartFormat, FeatureKeys, HubUserSettings};
