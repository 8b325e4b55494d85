//! Randomly generated trades for offline display.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::error::Result;
use crate::models::TradeRecord;
use crate::source::TradeSource;

const DEMO_TRADE_COUNT: usize = 150;
const DEMO_ITEM_COUNT: usize = 5;
const DEMO_LOOKBACK_HOURS: f64 = 168.0;
const DEMO_CURRENCIES: [&str; 2] = ["Adena", "MasterCoin"];

/// Generates trades spread over the week before `now`.
///
/// Prices are whole numbers in `50..550`, quantities `1..=10`, and each trade
/// picks one of the demo items, currencies and sellers uniformly. A seed makes
/// the batch reproducible.
#[derive(Debug, Clone)]
pub struct DemoSource {
    now: DateTime<Utc>,
    count: usize,
    items: Vec<String>,
    seed: Option<u64>,
}

impl DemoSource {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            count: DEMO_TRADE_COUNT,
            items: (1..=DEMO_ITEM_COUNT).map(|i| format!("Demo Item {i}")).collect(),
            seed: None,
        }
    }

    /// Number of trades per batch. Defaults to 150.
    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Item names to draw from. Defaults to `Demo Item 1` .. `Demo Item 5`.
    pub fn items<S: Into<String>>(mut self, items: impl IntoIterator<Item = S>) -> Self {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generate one batch of demo records.
    pub fn generate(&self) -> Vec<TradeRecord> {
        if self.items.is_empty() {
            return Vec::new();
        }
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        (0..self.count)
            .map(|_| {
                let hours_ago = rng.gen::<f64>() * DEMO_LOOKBACK_HOURS;
                let created_at =
                    self.now - Duration::milliseconds((hours_ago * 3_600_000.0) as i64);
                TradeRecord {
                    item_name: Some(self.items[rng.gen_range(0..self.items.len())].clone()),
                    price: Some(f64::from(rng.gen_range(50u32..550))),
                    quantity: Some(rng.gen_range(1..=10)),
                    currency: Some(DEMO_CURRENCIES[rng.gen_range(0..DEMO_CURRENCIES.len())].to_string()),
                    seller_name: Some(format!("DemoSeller{}", rng.gen_range(0u32..100))),
                    created_at: Some(created_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
                }
            })
            .collect()
    }
}

impl TradeSource for DemoSource {
    fn name(&self) -> &str {
        "demo"
    }

    fn fetch(&self) -> Result<Vec<TradeRecord>> {
        Ok(self.generate())
    }
}
