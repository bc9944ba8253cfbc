//! Name translation between hub feature keys and local credential fields.
//!
//! The table is listed in full below and indexed once on first use. Keys
//! missing from it are dropped by both translation directions.

use std::collections::HashMap;
use std::sync::OnceLock;

use secrecy::ExposeSecret;
use tracing::debug;

use crate::auth::Credentials;
use crate::models::{FeatureKeys, HubUserSettings};

/// (hub feature key, local credential field)
pub const KEY_TABLE: &[(&str, &str)] = &[
    ("API_KEY_ALPHAVANTAGE", "alpha_vantage_api_key"),
    ("API_BENZINGA_KEY", "benzinga_api_key"),
    ("API_BIZTOC_TOKEN", "biztoc_api_key"),
    ("API_CMC_KEY", "cmc_api_key"),
    ("API_EODHD_KEY", "eodhd_api_key"),
    ("API_KEY_FINANCIALMODELINGPREP", "fmp_api_key"),
    ("API_FINNHUB_KEY", "finnhub_api_key"),
    ("API_FRED_KEY", "fred_api_key"),
    ("API_INTRINIO_KEY", "intrinio_api_key"),
    ("API_KEY_QUANDL", "nasdaq_api_key"),
    ("API_POLYGON_KEY", "polygon_api_key"),
    ("API_TIINGO_KEY", "tiingo_token"),
    ("API_TRADIER_TOKEN", "tradier_api_key"),
    ("API_TRADINGECONOMICS_KEY", "tradingeconomics_api_key"),
];

/// Global index over `KEY_TABLE`, built once
static KEY_MAP: OnceLock<KeyMap> = OnceLock::new();

#[derive(Debug)]
pub struct KeyMap {
    hub_to_local: HashMap<&'static str, &'static str>,
    local_to_hub: HashMap<&'static str, &'static str>,
}

impl KeyMap {
    fn build(table: &'static [(&'static str, &'static str)]) -> Self {
        let hub_to_local: HashMap<_, _> = table.iter().copied().collect();
        let local_to_hub: HashMap<_, _> = table.iter().map(|&(hub, local)| (local, hub)).collect();
        debug_assert_eq!(hub_to_local.len(), table.len(), "duplicate hub key in KEY_TABLE");
        debug_assert_eq!(local_to_hub.len(), table.len(), "duplicate local field in KEY_TABLE");
        Self {
            hub_to_local,
            local_to_hub,
        }
    }

    /// The shared map over `KEY_TABLE`
    pub fn global() -> &'static KeyMap {
        KEY_MAP.get_or_init(|| Self::build(KEY_TABLE))
    }

    pub fn local_field(&self, hub_key: &str) -> Option<&'static str> {
        self.hub_to_local.get(hub_key).copied()
    }

    pub fn hub_key(&self, local_field: &str) -> Option<&'static str> {
        self.local_to_hub.get(local_field).copied()
    }

    pub fn len(&self) -> usize {
        self.hub_to_local.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hub_to_local.is_empty()
    }

    pub fn hub_to_local(&self, keys: &FeatureKeys) -> Credentials {
        let mut credentials = Credentials::new();
        for (name, value) in keys.iter() {
            match self.local_field(name) {
                Some(field) => credentials.insert(field, value.expose_secret()),
                None => debug!(key = %name, "Dropping hub key with no local field"),
            }
        }
        credentials
    }

    pub fn local_to_hub(&self, credentials: &Credentials) -> FeatureKeys {
        let mut keys = FeatureKeys::new();
        for (field, value) in credentials.iter() {
            match self.hub_key(field) {
                Some(name) => keys.insert(name, value.expose_secret()),
                None => debug!(field = %field, "Dropping credential with no hub key"),
            }
        }
        keys
    }
}

/// Translate a hub settings document into local credentials
pub fn hub_to_local(settings: &HubUserSettings) -> Credentials {
    KeyMap::global().hub_to_local(&settings.features_keys)
}

/// Translate local credentials into a hub settings document
pub fn local_to_hub(credentials: &Credentials) -> HubUserSettings {
    HubUserSettings::new(KeyMap::global().local_to_hub(credentials))
}
