use std::collections::BTreeMap;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::auth::REDACTED;

/// Provider API keys in the hub's flat naming convention
/// (`API_KEY_FINANCIALMODELINGPREP`, `API_POLYGON_KEY`, ...).
///
/// Keeps every key the hub sends, including ones this crate has no local
/// name for.
#[derive(Debug, Default)]
pub struct FeatureKeys {
    keys: BTreeMap<String, SecretString>,
}

impl FeatureKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key; empty values are treated as unset
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if value.is_empty() {
            self.keys.remove(&name);
        } else {
            self.keys.insert(name, SecretString::from(value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&SecretString> {
        self.keys.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SecretString)> {
        self.keys.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Plain values for the wire. Only called when building a hub request.
    pub(crate) fn to_wire(&self) -> BTreeMap<String, Option<String>> {
        self.keys
            .iter()
            .map(|(k, v)| (k.clone(), Some(v.expose_secret().to_string())))
            .collect()
    }

    pub(crate) fn from_wire(wire: BTreeMap<String, Option<String>>) -> Self {
        wire.into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FeatureKeys {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut keys = Self::new();
        for (name, value) in iter {
            keys.insert(name, value);
        }
        keys
    }
}

impl PartialEq for FeatureKeys {
    fn eq(&self, other: &Self) -> bool {
        self.keys.len() == other.keys.len()
            && self.keys.iter().zip(other.keys.iter()).all(|((ka, va), (kb, vb))| {
                ka == kb && va.expose_secret() == vb.expose_secret()
            })
    }
}

impl fmt::Display for FeatureKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeatureKeys")?;
        for name in self.keys.keys() {
            write!(f, "\n{}: {}", name, REDACTED)?;
        }
        Ok(())
    }
}
