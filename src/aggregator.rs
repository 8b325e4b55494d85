//! Per-item market summaries.
//!
//! Trades are grouped by item name and every group is bucketed once per
//! catalog range. Summary fields (total quantity, minimum price, price change,
//! recent listings) are derived from the same group.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use indexmap::IndexMap;

use crate::bucketizer::Bucketizer;
use crate::catalog::RangeCatalog;
use crate::config;
use crate::models::{BucketPoint, ItemAggregate, Listing, Trade};

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Builds [`ItemAggregate`]s over every range of a catalog.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    catalog: &'a RangeCatalog,
    label_offset: FixedOffset,
}

impl<'a> Aggregator<'a> {
    /// Create a new `Aggregator` bound to the given catalog.
    pub fn new(catalog: &'a RangeCatalog) -> Self {
        Self {
            catalog,
            label_offset: Utc.fix(),
        }
    }

    /// Render chart labels at a fixed offset from UTC.
    pub fn with_label_offset(mut self, offset: FixedOffset) -> Self {
        self.label_offset = offset;
        self
    }

    /// Summarize `trades` per item, with every range measured back from `now`.
    ///
    /// Items appear in the order they first appear in `trades`. Trades
    /// without an item name are ignored; an empty input gives an empty output.
    pub fn aggregate(&self, trades: &[Trade], now: DateTime<Utc>) -> Vec<ItemAggregate> {
        let bucketizer = Bucketizer::new(self.catalog).with_label_offset(self.label_offset);
        let groups = group_by_item(trades);

        let items: Vec<ItemAggregate> = groups
            .into_iter()
            .map(|(name, mut group)| {
                // Stable, so same-instant trades keep input order; undated trades go first.
                group.sort_by_key(|t| t.created_at);

                let trade_history: IndexMap<String, Vec<BucketPoint>> = self
                    .catalog
                    .ids()
                    .map(|id| {
                        let points = bucketizer.bucketize(group.iter().copied(), id, now);
                        (id.to_string(), points)
                    })
                    .collect();

                let price_change = trade_history
                    .get(config::PRICE_CHANGE_RANGE)
                    .map_or(0.0, |points| price_change(points));

                let currency = group
                    .last()
                    .map(|t| t.currency_label.clone())
                    .unwrap_or_default();

                ItemAggregate {
                    id: name.to_string(),
                    name: name.to_string(),
                    total_quantity: total_quantity(&group),
                    min_price: min_price(&group),
                    currency,
                    price_change,
                    listings: recent_listings(&group),
                    trade_history,
                }
            })
            .collect();

        tracing::debug!(
            trades = trades.len(),
            items = items.len(),
            ranges = self.catalog.len(),
            "aggregated trades"
        );
        items
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Group trades by item name in first-appearance order, skipping unnamed trades.
pub fn group_by_item(trades: &[Trade]) -> IndexMap<&str, Vec<&Trade>> {
    let mut groups: IndexMap<&str, Vec<&Trade>> = IndexMap::new();
    for trade in trades {
        let Some(name) = trade.item_name.as_deref() else {
            continue;
        };
        groups.entry(name).or_default().push(trade);
    }
    groups
}

/// Percent change from the first to the last point's average price.
///
/// Zero with fewer than two points or a zero starting price.
pub fn price_change(points: &[BucketPoint]) -> f64 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return 0.0;
    };
    if points.len() < 2 || first.avg_price == 0.0 {
        return 0.0;
    }
    (last.avg_price - first.avg_price) / first.avg_price * 100.0
}

/// Saturating sum of quantities, invalid-price trades included.
fn total_quantity(group: &[&Trade]) -> u64 {
    group.iter().fold(0u64, |acc, t| acc.saturating_add(t.quantity))
}

/// Lowest positive price, or zero when no trade has one.
fn min_price(group: &[&Trade]) -> f64 {
    group
        .iter()
        .map(|t| t.price)
        .filter(|p| *p > 0.0)
        .fold(None, |min: Option<f64>, p| Some(min.map_or(p, |m| m.min(p))))
        .unwrap_or(0.0)
}

/// Most recent trades first; `group` must be sorted oldest first.
fn recent_listings(group: &[&Trade]) -> Vec<Listing> {
    group
        .iter()
        .rev()
        .take(config::LISTING_LIMIT)
        .map(|t| Listing::from_trade(t))
        .collect()
}
