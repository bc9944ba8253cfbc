use std::collections::BTreeMap;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use super::session::REDACTED;

/// Provider API keys in the local naming convention (`fmp_api_key`, ...).
#[derive(Debug, Default)]
pub struct Credentials {
    keys: BTreeMap<String, SecretString>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key; empty values are treated as unset
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        if value.is_empty() {
            self.keys.remove(&field);
        } else {
            self.keys.insert(field, SecretString::from(value));
        }
    }

    pub fn get(&self, field: &str) -> Option<&SecretString> {
        self.keys.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.keys.contains_key(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<SecretString> {
        self.keys.remove(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SecretString)> {
        self.keys.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Credentials {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut credentials = Self::new();
        for (field, value) in iter {
            credentials.insert(field, value);
        }
        credentials
    }
}

impl PartialEq for Credentials {
    fn eq(&self, other: &Self) -> bool {
        self.keys.len() == other.keys.len()
            && self.keys.iter().zip(other.keys.iter()).all(|((ka, va), (kb, vb))| {
                ka == kb && va.expose_secret() == vb.expose_secret()
            })
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credentials")?;
        for field in self.keys.keys() {
            write!(f, "\n{}: {}", field, REDACTED)?;
        }
        Ok(())
    }
}
