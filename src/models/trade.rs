use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::currency::{Currency, CurrencyTable};

// ---------------------------------------------------------------------------
// TradeRecord: A trade row as delivered by a trade source
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub item_name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub currency: Option<String>,
    pub seller_name: Option<String>,
    pub created_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Trade: An ingested trade with every default applied
// ---------------------------------------------------------------------------

/// A trade after ingestion.
///
/// Default substitution happens here and nowhere else:
///
/// | field | missing / malformed input becomes |
/// |---|---|
/// | `item_name` | `None` (blank names too); such trades are never aggregated |
/// | `price` | `0.0` for missing, negative or non-finite prices |
/// | `quantity` | `0` for missing or negative quantities |
/// | `currency` | the table's default currency |
/// | `currency_label` | the default currency's label |
/// | `seller` | [`DEFAULT_SELLER`](config::DEFAULT_SELLER) |
/// | `created_at` | `None` when the timestamp does not parse |
///
/// A zero price or quantity keeps the trade out of bucket statistics while
/// still counting it towards raw totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub item_name: Option<String>,
    pub price: f64,
    pub quantity: u64,
    pub currency: Currency,
    pub currency_label: String,
    pub seller: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Trade {
    /// Apply the ingestion rules to a raw record.
    pub fn from_record(record: TradeRecord, currencies: &CurrencyTable) -> Self {
        let item_name = record.item_name.filter(|n| !n.trim().is_empty());

        let price = match record.price {
            Some(p) if p.is_finite() && p > 0.0 => p,
            _ => 0.0,
        };
        let quantity = record.quantity.map_or(0, |q| q.max(0) as u64);

        let currency = currencies.normalize_or_default(record.currency.as_deref());
        let currency_label = match record.currency.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => currencies.default_currency().label().to_string(),
        };

        let seller = match record.seller_name.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => config::DEFAULT_SELLER.to_string(),
        };

        let created_at = record.created_at.as_deref().and_then(parse_timestamp);

        Self {
            item_name,
            price,
            quantity,
            currency,
            currency_label,
            seller,
            created_at,
        }
    }

    /// Whether this trade contributes to bucket statistics.
    pub fn has_valid_stats(&self) -> bool {
        self.price > 0.0 && self.quantity > 0
    }

    pub fn timestamp_ms(&self) -> Option<i64> {
        self.created_at.map(|ts| ts.timestamp_millis())
    }
}

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f%#z"]
        .iter()
        .find_map(|fmt| {
            DateTime::parse_from_str(raw, fmt)
                .map(|ts| ts.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(raw, fmt)
                        .ok()
                        .map(|naive| naive.and_utc())
                })
        })
}
