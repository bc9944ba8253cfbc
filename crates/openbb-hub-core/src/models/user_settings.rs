use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::FeatureKeys;

/// Settings document stored on the hub for a user.
///
/// Only `features_keys` is interpreted. The other sections are carried
/// through untouched so a pull followed by a push does not lose them.
#[derive(Debug, Default, PartialEq)]
pub struct HubUserSettings {
    pub features_keys: FeatureKeys,
    pub features_settings: BTreeMap<String, Value>,
    pub features_sources: BTreeMap<String, Value>,
    pub features_terminal_style: BTreeMap<String, Value>,
}

/// JSON shape of `HubUserSettings` on the wire.
/// The hub may send `null` for any section, hence the options.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct UserSettingsWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    features_settings: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    features_keys: Option<BTreeMap<String, Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    features_sources: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    features_terminal_style: Option<BTreeMap<String, Value>>,
}

fn non_empty<T>(map: &BTreeMap<String, T>) -> Option<BTreeMap<String, T>>
where
    T: Clone,
{
    if map.is_empty() {
        None
    } else {
        Some(map.clone())
    }
}

impl HubUserSettings {
    pub fn new(features_keys: FeatureKeys) -> Self {
        Self {
            features_keys,
            ..Self::default()
        }
    }

    /// Body for `PUT /user`. Empty sections are omitted.
    pub fn to_json(&self) -> Value {
        let wire = UserSettingsWire {
            features_settings: non_empty(&self.features_settings),
            features_keys: if self.features_keys.is_empty() {
                None
            } else {
                Some(self.features_keys.to_wire())
            },
            features_sources: non_empty(&self.features_sources),
            features_terminal_style: non_empty(&self.features_terminal_style),
        };
        serde_json::to_value(wire).unwrap_or(Value::Null)
    }
}

impl From<UserSettingsWire> for HubUserSettings {
    fn from(wire: UserSettingsWire) -> Self {
        Self {
            features_keys: FeatureKeys::from_wire(wire.features_keys.unwrap_or_default()),
            features_settings: wire.features_settings.unwrap_or_default(),
            features_sources: wire.features_sources.unwrap_or_default(),
            features_terminal_style: wire.features_terminal_style.unwrap_or_default(),
        }
    }
}
