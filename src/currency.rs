//! Currency normalization, per-currency partitioning and the one-shot
//! currency auto-selection.
//!
//! Free-text currency labels are resolved once, at ingestion, into a
//! [`Currency`]. Recognized spellings come from a [`CurrencyTable`] built from
//! configuration; anything unrecognized becomes [`Currency::Other`] holding its
//! trimmed lower-cased text, so it still forms its own partition.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::{Result, TrackerError};
use crate::models::Trade;

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

/// In-game currency a trade was settled in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Currency {
    Adena,
    MasterCoin,
    /// Unrecognized label, stored trimmed and lower-cased.
    Other(String),
}

impl Currency {
    /// The recognized currencies, in display order.
    pub fn known() -> [Currency; 2] {
        [Currency::Adena, Currency::MasterCoin]
    }

    /// Resolve a canonical id (`"adena"`, `"mastercoin"`) to a known currency.
    pub fn from_id(id: &str) -> Option<Currency> {
        match id {
            "adena" => Some(Currency::Adena),
            "mastercoin" => Some(Currency::MasterCoin),
            _ => None,
        }
    }

    /// Canonical identifier used for comparisons and serialization.
    pub fn id(&self) -> &str {
        match self {
            Currency::Adena => "adena",
            Currency::MasterCoin => "mastercoin",
            Currency::Other(s) => s,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        match self {
            Currency::Adena => "Adena",
            Currency::MasterCoin => "MasterCoin",
            Currency::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Currency::Other(_))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Canonical ids are matched after trimming and lower-casing; synonyms are
/// not resolved here.
impl From<String> for Currency {
    fn from(id: String) -> Self {
        let id = fold(&id);
        Currency::from_id(&id).unwrap_or(Currency::Other(id))
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.id().to_string()
    }
}

// ---------------------------------------------------------------------------
// CurrencyTable
// ---------------------------------------------------------------------------

/// Synonym table mapping normalized labels to canonical currencies.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyTable {
    synonyms: HashMap<String, Currency>,
    default: Currency,
}

impl Default for CurrencyTable {
    fn default() -> Self {
        // The built-in table is known to be consistent.
        let mut synonyms = HashMap::new();
        for (id, aliases) in config::default_currency_synonyms() {
            let currency = Currency::from(id.clone());
            synonyms.insert(id, currency.clone());
            for alias in aliases {
                synonyms.insert(alias, currency.clone());
            }
        }
        Self {
            synonyms,
            default: Currency::Adena,
        }
    }
}

impl CurrencyTable {
    /// Build and validate a table from configured synonyms.
    ///
    /// Errors:
    /// - a canonical id that is not a known currency
    /// - a synonym that is blank after trimming
    /// - a synonym claimed by two different currencies
    /// - a default currency that is not a known currency
    pub fn from_config(
        currencies: &IndexMap<String, Vec<String>>,
        default_currency: &str,
    ) -> Result<Self> {
        let mut synonyms: HashMap<String, Currency> = HashMap::new();

        for (raw_id, aliases) in currencies {
            let id = fold(raw_id);
            let currency = Currency::from_id(&id).ok_or_else(|| {
                TrackerError::InvalidConfig(format!("unknown currency id: {raw_id}"))
            })?;

            for raw_alias in std::iter::once(raw_id).chain(aliases.iter()) {
                let alias = fold(raw_alias);
                if alias.is_empty() {
                    return Err(TrackerError::InvalidConfig(format!(
                        "blank synonym for currency {id}"
                    )));
                }
                match synonyms.get(&alias) {
                    Some(existing) if *existing != currency => {
                        return Err(TrackerError::InvalidConfig(format!(
                            "synonym {alias:?} maps to both {existing} and {currency}"
                        )));
                    }
                    _ => {
                        synonyms.insert(alias, currency.clone());
                    }
                }
            }
        }

        let default = Currency::from_id(&fold(default_currency)).ok_or_else(|| {
            TrackerError::InvalidConfig(format!("unknown default currency: {default_currency}"))
        })?;

        Ok(Self { synonyms, default })
    }

    /// Canonicalize a free-text label: trim, lower-case, then resolve synonyms.
    pub fn normalize(&self, raw: &str) -> Currency {
        let folded = fold(raw);
        match self.synonyms.get(&folded) {
            Some(c) => c.clone(),
            None => Currency::Other(folded),
        }
    }

    /// Like [`normalize`](Self::normalize), but a missing or blank label
    /// resolves to the default currency.
    pub fn normalize_or_default(&self, raw: Option<&str>) -> Currency {
        match raw.map(str::trim) {
            Some(s) if !s.is_empty() => self.normalize(s),
            _ => self.default.clone(),
        }
    }

    pub fn default_currency(&self) -> &Currency {
        &self.default
    }
}

fn fold(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalize a currency label with the built-in synonym table.
pub fn normalize_currency(raw: &str) -> Currency {
    static TABLE: OnceLock<CurrencyTable> = OnceLock::new();
    TABLE.get_or_init(CurrencyTable::default).normalize(raw)
}

// ---------------------------------------------------------------------------
// Partitioning
// ---------------------------------------------------------------------------

/// Trades settled in `currency`, in input order.
pub fn partition(trades: &[Trade], currency: &Currency) -> Vec<Trade> {
    trades
        .iter()
        .filter(|t| t.currency == *currency)
        .cloned()
        .collect()
}

/// Every currency present in `trades` with its trades, in first-appearance order.
pub fn split_by_currency(trades: &[Trade]) -> IndexMap<Currency, Vec<Trade>> {
    let mut out: IndexMap<Currency, Vec<Trade>> = IndexMap::new();
    for t in trades {
        out.entry(t.currency.clone()).or_default().push(t.clone());
    }
    out
}

// ---------------------------------------------------------------------------
// CurrencySelection
// ---------------------------------------------------------------------------

/// The currency a caller is viewing, plus whether the one-shot
/// auto-selection has already run for the current data load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencySelection {
    pub selected: Currency,
    pub auto_selected: bool,
}

impl Default for CurrencySelection {
    fn default() -> Self {
        Self::new(Currency::Adena)
    }
}

impl CurrencySelection {
    pub fn new(selected: Currency) -> Self {
        Self {
            selected,
            auto_selected: false,
        }
    }

    /// Run the auto-selection once for a fresh trade set.
    ///
    /// If the selected currency has no trades, switch to the currency of the
    /// first trade. The flag is then set, so later calls are no-ops until
    /// [`reset`](Self::reset). An empty trade set leaves the flag clear.
    pub fn auto_select(&self, trades: &[Trade]) -> Self {
        if self.auto_selected {
            return self.clone();
        }
        let Some(first) = trades.first() else {
            return self.clone();
        };

        let mut next = self.clone();
        if !trades.iter().any(|t| t.currency == self.selected) {
            tracing::info!(
                from = %self.selected,
                to = %first.currency,
                "no trades in selected currency; switching"
            );
            next.selected = first.currency.clone();
        }
        next.auto_selected = true;
        next
    }

    /// Explicit user choice; leaves the auto-selection flag untouched.
    pub fn select(&self, currency: Currency) -> Self {
        Self {
            selected: currency,
            auto_selected: self.auto_selected,
        }
    }

    /// Re-arm the auto-selection for the next data load.
    pub fn reset(&self) -> Self {
        Self {
            selected: self.selected.clone(),
            auto_selected: false,
        }
    }
}
