//! Market tracker SDK for Rust.
//!
//! Turns a flat list of in-game trades into per-item, per-currency market
//! summaries: time-bucketed price and volume charts for every supported range,
//! plus price change, minimum price, total quantity and recent listings.
//! Everything is computed in-process from the trades handed in; nothing is
//! cached between calls.
//!
//! # Quick start
//!
//! ```no_run
//! use market_tracker_sdk::{CurrencySelection, MarketTracker};
//! use market_tracker_sdk::source::{load_with_fallback, DemoSource, JsonFileSource};
//!
//! let tracker = MarketTracker::builder().build().unwrap();
//!
//! let loaded = load_with_fallback(
//!     &JsonFileSource::new("trades.json"),
//!     &DemoSource::new(tracker.now()),
//! );
//! let trades = tracker.ingest(loaded.records);
//!
//! let view = tracker.summarize(&trades, &CurrencySelection::default());
//! for item in &view.items {
//!     println!("{}: {:+.2}%", item.name, item.price_change);
//! }
//! ```

pub mod aggregator;
#[cfg(feature = "async")]
pub mod async_client;
pub mod bucketizer;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod currency;
pub mod error;
pub mod models;
pub mod search;
pub mod source;

pub use aggregator::Aggregator;
#[cfg(feature = "async")]
pub use async_client::AsyncMarketTracker;
pub use bucketizer::Bucketizer;
pub use catalog::{RangeCatalog, TimeRange};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::TrackerConfig;
pub use currency::{normalize_currency, Currency, CurrencySelection, CurrencyTable};
pub use error::{Result, TrackerError};
pub use models::{BucketPoint, ItemAggregate, Listing, MarketView, RangeSnapshot, Trade, TradeRecord};

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Offset, Utc};

// ---------------------------------------------------------------------------
// MarketTrackerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`MarketTracker`].
///
/// Use [`MarketTracker::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](MarketTrackerBuilder::build).
#[derive(Debug)]
pub struct MarketTrackerBuilder {
    config: TrackerConfig,
    clock: Arc<dyn Clock>,
    label_offset: FixedOffset,
}

impl Default for MarketTrackerBuilder {
    fn default() -> Self {
        Self {
            config: TrackerConfig::default(),
            clock: Arc::new(SystemClock),
            label_offset: Utc.fix(),
        }
    }
}

impl MarketTrackerBuilder {
    /// Replace the built-in ranges and currency synonyms.
    pub fn config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the clock ranges are measured back from.
    ///
    /// Defaults to [`SystemClock`]. Pass a [`FixedClock`] for reproducible output.
    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Render chart labels at a fixed offset from UTC. Defaults to UTC.
    pub fn label_offset(mut self, offset: FixedOffset) -> Self {
        self.label_offset = offset;
        self
    }

    /// Validate the configuration and build the tracker.
    pub fn build(self) -> Result<MarketTracker> {
        let catalog = RangeCatalog::from_config(&self.config.ranges)?;
        let currencies =
            CurrencyTable::from_config(&self.config.currencies, &self.config.default_currency)?;
        Ok(MarketTracker {
            catalog,
            currencies,
            clock: self.clock,
            label_offset: self.label_offset,
        })
    }
}

// ---------------------------------------------------------------------------
// MarketTracker
// ---------------------------------------------------------------------------

/// The main entry point for the SDK.
///
/// Holds the validated range catalog and currency table plus the clock. All
/// methods take `&self` and keep no state between calls, so one tracker can
/// be shared across threads.
#[derive(Debug, Clone)]
pub struct MarketTracker {
    catalog: RangeCatalog,
    currencies: CurrencyTable,
    clock: Arc<dyn Clock>,
    label_offset: FixedOffset,
}

impl MarketTracker {
    /// Create a new builder for configuring the tracker.
    pub fn builder() -> MarketTrackerBuilder {
        MarketTrackerBuilder::default()
    }

    // -- Accessors ---------------------------------------------------------

    /// Ranges every item is bucketed over, in declaration order.
    pub fn catalog(&self) -> &RangeCatalog {
        &self.catalog
    }

    /// Synonym table used to normalize currency labels at ingestion.
    pub fn currencies(&self) -> &CurrencyTable {
        &self.currencies
    }

    /// Current instant according to the configured clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // -- Ingestion ---------------------------------------------------------

    /// Apply the ingestion defaults to raw records.
    pub fn ingest(&self, records: Vec<TradeRecord>) -> Vec<Trade> {
        records
            .into_iter()
            .map(|r| Trade::from_record(r, &self.currencies))
            .collect()
    }

    /// Canonicalize a free-text currency label with this tracker's synonyms.
    pub fn normalize_currency(&self, raw: &str) -> Currency {
        self.currencies.normalize(raw)
    }

    // -- Aggregation -------------------------------------------------------

    /// Chart points for one range. Unknown ranges yield an empty sequence.
    pub fn bucketize(&self, trades: &[Trade], range_id: &str) -> Vec<BucketPoint> {
        Bucketizer::new(&self.catalog)
            .with_label_offset(self.label_offset)
            .bucketize(trades, range_id, self.now())
    }

    /// Per-item summaries over every range, sharing one reference instant.
    pub fn aggregate(&self, trades: &[Trade]) -> Vec<ItemAggregate> {
        Aggregator::new(&self.catalog)
            .with_label_offset(self.label_offset)
            .aggregate(trades, self.now())
    }

    /// Trades settled in `currency`.
    pub fn partition(&self, trades: &[Trade], currency: &Currency) -> Vec<Trade> {
        crate::currency::partition(trades, currency)
    }

    /// Auto-select a currency if needed, then aggregate that currency's trades.
    ///
    /// The returned view carries the updated selection for the next call.
    pub fn summarize(&self, trades: &[Trade], selection: &CurrencySelection) -> MarketView {
        let selection = selection.auto_select(trades);
        let subset = self.partition(trades, &selection.selected);
        let items = self.aggregate(&subset);
        MarketView { selection, items }
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for MarketTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ranges: Vec<&str> = self.catalog.ids().collect();
        write!(
            f,
            "MarketTracker(ranges=[{}], default_currency={}, label_offset={})",
            ranges.join(", "),
            self.currencies.default_currency(),
            self.label_offset
        )
    }
}
