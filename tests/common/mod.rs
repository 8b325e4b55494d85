//! Shared fixtures for the market tracker integration tests.
//!
//! Everything is anchored to a fixed `now` so bucket boundaries and labels
//! are reproducible.

#![allow(dead_code)]

use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use market_tracker_sdk::{CurrencyTable, FixedClock, MarketTracker, Trade, TradeRecord};

/// 2024-03-15 12:00:00 UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
}

/// A tracker with the built-in config and a clock frozen at [`now`].
pub fn tracker() -> MarketTracker {
    MarketTracker::builder()
        .clock(FixedClock::new(now()))
        .build()
        .unwrap()
}

/// Timestamp `minutes` before [`now`], as the ISO string a source would send.
pub fn minutes_ago(minutes: i64) -> String {
    (now() - Duration::minutes(minutes)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A complete raw record.
pub fn record(
    item: &str,
    price: f64,
    quantity: i64,
    currency: &str,
    seller: &str,
    minutes: i64,
) -> TradeRecord {
    TradeRecord {
        item_name: Some(item.to_string()),
        price: Some(price),
        quantity: Some(quantity),
        currency: Some(currency.to_string()),
        seller_name: Some(seller.to_string()),
        created_at: Some(minutes_ago(minutes)),
    }
}

/// An ingested Adena trade `minutes` before [`now`].
pub fn trade(item: &str, price: f64, quantity: i64, minutes: i64) -> Trade {
    Trade::from_record(
        record(item, price, quantity, "Adena", "Seller", minutes),
        &CurrencyTable::default(),
    )
}

/// An ingested trade in the given currency.
pub fn trade_in(item: &str, price: f64, quantity: i64, currency: &str, minutes: i64) -> Trade {
    Trade::from_record(
        record(item, price, quantity, currency, "Seller", minutes),
        &CurrencyTable::default(),
    )
}

/// A small mixed-currency market.
pub fn sample_trades() -> Vec<Trade> {
    let table = CurrencyTable::default();
    vec![
        record("Sword of Valor", 120.0, 2, "Adena", "Alice", 300),
        record("Healing Potion", 15.0, 10, "adena", "Bob", 250),
        record("Sword of Valor", 130.0, 1, "Adena", "Carol", 90),
        record("Dragon Scale", 4.5, 3, "MasterCoin", "Dave", 60),
        record("Sword of Valor", 150.0, 1, " ADENA ", "Erin", 30),
        record("Dragon Scale", 5.0, 2, "master_coin", "Frank", 10),
    ]
    .into_iter()
    .map(|r| Trade::from_record(r, &table))
    .collect()
}
