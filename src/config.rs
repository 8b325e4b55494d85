//! Built-in tables and JSON-backed tracker configuration.
//!
//! The defaults mirror the ranges and currencies the market tracker has always
//! shipped with. A [`TrackerConfig`] can replace any of them from a JSON
//! document; validation happens when the config is turned into a
//! [`RangeCatalog`](crate::catalog::RangeCatalog) and a
//! [`CurrencyTable`](crate::currency::CurrencyTable).
//!
//! ```json
//! {
//!   "ranges": [{ "id": "1h", "durationMs": 3600000, "bucketMs": 900000 }],
//!   "currencies": { "adena": ["адена"], "mastercoin": ["master coin"] },
//!   "defaultCurrency": "adena"
//! }
//! ```

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

pub const MINUTE_MS: i64 = 60 * 1000;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
pub const DAY_MS: i64 = 24 * HOUR_MS;

/// Ranges at least this long are labelled by date instead of time of day.
pub const DATE_LABEL_MIN_MS: i64 = 7 * DAY_MS;

/// Upper bound on buckets per range, so a config cannot demand an unbounded allocation.
pub const MAX_BUCKETS: usize = 10_000;

/// Range whose history drives an item's price change.
pub const PRICE_CHANGE_RANGE: &str = "24h";

/// Number of most recent trades kept as listings per item.
pub const LISTING_LIMIT: usize = 5;

/// Seller shown for trades that arrive without one.
pub const DEFAULT_SELLER: &str = "Unknown";

/// Canonical id of the currency assumed for trades without one.
pub const DEFAULT_CURRENCY: &str = "adena";

// ---------------------------------------------------------------------------
// Default tables
// ---------------------------------------------------------------------------

/// One configured lookback range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RangeCfg {
    pub id: String,
    pub duration_ms: i64,
    pub bucket_ms: i64,
}

impl RangeCfg {
    pub fn new(id: &str, duration_ms: i64, bucket_ms: i64) -> Self {
        Self {
            id: id.to_string(),
            duration_ms,
            bucket_ms,
        }
    }
}

/// Supported ranges, short ones with fine buckets and long ones with coarse buckets.
pub fn default_ranges() -> Vec<RangeCfg> {
    vec![
        RangeCfg::new("1h", HOUR_MS, 15 * MINUTE_MS),
        RangeCfg::new("2h", 2 * HOUR_MS, 15 * MINUTE_MS),
        RangeCfg::new("3h", 3 * HOUR_MS, 30 * MINUTE_MS),
        RangeCfg::new("6h", 6 * HOUR_MS, 30 * MINUTE_MS),
        RangeCfg::new("12h", 12 * HOUR_MS, HOUR_MS),
        RangeCfg::new("24h", 24 * HOUR_MS, HOUR_MS),
        RangeCfg::new("3d", 3 * DAY_MS, 6 * HOUR_MS),
        RangeCfg::new("7d", 7 * DAY_MS, DAY_MS),
        RangeCfg::new("14d", 14 * DAY_MS, DAY_MS),
        RangeCfg::new("30d", 30 * DAY_MS, DAY_MS),
    ]
}

/// Synonyms per canonical currency id. The canonical id always matches itself.
pub fn default_currency_synonyms() -> IndexMap<String, Vec<String>> {
    IndexMap::from([
        ("adena".to_string(), vec!["адена".to_string()]),
        (
            "mastercoin".to_string(),
            vec!["master coin".to_string(), "master_coin".to_string()],
        ),
    ])
}

fn default_currency_id() -> String {
    DEFAULT_CURRENCY.to_string()
}

// ---------------------------------------------------------------------------
// TrackerConfig
// ---------------------------------------------------------------------------

/// Data-driven configuration for ranges and currency synonyms.
///
/// Every field is optional in JSON and falls back to the built-in table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TrackerConfig {
    #[serde(default = "default_ranges")]
    pub ranges: Vec<RangeCfg>,
    #[serde(default = "default_currency_synonyms")]
    pub currencies: IndexMap<String, Vec<String>>,
    #[serde(default = "default_currency_id")]
    pub default_currency: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            ranges: default_ranges(),
            currencies: default_currency_synonyms(),
            default_currency: default_currency_id(),
        }
    }
}

/// Parse a tracker config from a JSON string.
pub fn load_config_str(json: &str) -> Result<TrackerConfig> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a tracker config from a JSON file.
pub fn load_config_path<P: AsRef<Path>>(path: P) -> Result<TrackerConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(TrackerError::NotFound(format!(
            "Config file {} does not exist",
            path.display()
        )));
    }
    let contents = fs::read_to_string(path)?;
    load_config_str(&contents)
}
