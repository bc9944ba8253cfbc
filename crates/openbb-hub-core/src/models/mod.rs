//! Data models exchanged with the hub or handed to callers.
//!
//! - `FeatureKeys`, `HubUserSettings`: the hub's settings document
//! - `Chart`, `ChartFormat`: chart data holder attached to results

pub mod chart;
pub mod features_keys;
pub mod user_settings;

pub use chart::{Chart, ChartFormat, Figure};
pub use features_keys::FeatureKeys;
pub use user_settings::HubUserSettings;
pub(crate) use user_settings::UserSettingsWire;
