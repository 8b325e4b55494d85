use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::currency::CurrencySelection;
use crate::models::Trade;

// ---------------------------------------------------------------------------
// BucketPoint: One chart point for a bucket that saw valid trades
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketPoint {
    pub time: String,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub volume: u64,
}

// ---------------------------------------------------------------------------
// Listing: A recent trade as shown in an item's listing table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub seller: String,
    pub currency: String,
    pub price_per_unit: f64,
    pub quantity: u64,
}

impl Listing {
    pub fn from_trade(trade: &Trade) -> Self {
        Self {
            seller: trade.seller.clone(),
            currency: trade.currency_label.clone(),
            price_per_unit: trade.price,
            quantity: trade.quantity,
        }
    }

    /// Price of the whole lot.
    pub fn total_value(&self) -> f64 {
        self.price_per_unit * self.quantity as f64
    }

    /// In-game chat command that targets the seller.
    pub fn target_command(&self) -> String {
        format!("/target {}", self.seller)
    }
}

// ---------------------------------------------------------------------------
// ItemAggregate: Market summary of one item across every range
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAggregate {
    pub id: String,
    pub name: String,
    pub total_quantity: u64,
    pub min_price: f64,
    /// Currency label of the most recent trade.
    pub currency: String,
    /// Signed percent change across the 24h history.
    pub price_change: f64,
    /// Up to five most recent trades, newest first.
    pub listings: Vec<Listing>,
    /// Range id to chart points, in catalog order.
    pub trade_history: IndexMap<String, Vec<BucketPoint>>,
}

impl ItemAggregate {
    /// Points for a range; empty for ranges the item has no history for.
    pub fn history(&self, range_id: &str) -> &[BucketPoint] {
        self.trade_history
            .get(range_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Latest point and total volume for a range.
    pub fn snapshot(&self, range_id: &str) -> RangeSnapshot {
        let points = self.history(range_id);
        RangeSnapshot {
            range: range_id.to_string(),
            last: points.last().cloned(),
            total_volume: points
                .iter()
                .fold(0u64, |acc, p| acc.saturating_add(p.volume)),
        }
    }

    pub fn is_rising(&self) -> bool {
        self.price_change >= 0.0
    }

    pub fn has_history(&self) -> bool {
        self.trade_history.values().any(|p| !p.is_empty())
    }
}

// ---------------------------------------------------------------------------
// RangeSnapshot: Detail-table figures for one range
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSnapshot {
    pub range: String,
    pub last: Option<BucketPoint>,
    pub total_volume: u64,
}

// ---------------------------------------------------------------------------
// MarketView: Aggregates for the currency a caller is viewing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketView {
    pub selection: CurrencySelection,
    pub items: Vec<ItemAggregate>,
}

impl MarketView {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, id: &str) -> Option<&ItemAggregate> {
        self.items.iter().find(|i| i.id == id)
    }
}
