//! Fixed-width time bucketing of trades into chart points.
//!
//! For a range of `duration` split into `bucket`-wide windows, the window
//! `[now - duration, now]` is cut into `ceil(duration / bucket)` buckets. Each
//! trade with a valid price and quantity inside the window is accumulated into
//! the bucket its timestamp falls in. Buckets that received nothing are
//! dropped, so the output is neither fixed-length nor evenly spaced.

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};

use crate::catalog::{RangeCatalog, TimeRange};
use crate::config;
use crate::models::{BucketPoint, Trade};

// ---------------------------------------------------------------------------
// Bucket
// ---------------------------------------------------------------------------

/// Running statistics for one window. Lives for a single bucketing pass.
#[derive(Debug, Clone)]
struct Bucket {
    start_ms: i64,
    sum_price_qty: f64,
    sum_qty: f64,
    min_price: f64,
    max_price: f64,
    volume: u64,
}

impl Bucket {
    fn new(start_ms: i64) -> Self {
        Self {
            start_ms,
            sum_price_qty: 0.0,
            sum_qty: 0.0,
            min_price: f64::INFINITY,
            max_price: f64::NEG_INFINITY,
            volume: 0,
        }
    }

    fn add(&mut self, price: f64, quantity: u64) {
        self.sum_price_qty += price * quantity as f64;
        self.sum_qty += quantity as f64;
        // Quantities are unbounded; volume saturates instead of wrapping.
        self.volume = self.volume.saturating_add(quantity);
        self.min_price = self.min_price.min(price);
        self.max_price = self.max_price.max(price);
    }

    fn avg_price(&self) -> f64 {
        if self.sum_qty <= 0.0 {
            return 0.0;
        }
        self.sum_price_qty / self.sum_qty
    }
}

// ---------------------------------------------------------------------------
// Bucketizer
// ---------------------------------------------------------------------------

/// Bucketing bound to a range catalog.
///
/// Labels are rendered at `label_offset` (UTC unless set otherwise): `dd.mm`
/// for ranges of seven days or more, `HH:MM` for shorter ones.
#[derive(Debug, Clone, Copy)]
pub struct Bucketizer<'a> {
    catalog: &'a RangeCatalog,
    label_offset: FixedOffset,
}

impl<'a> Bucketizer<'a> {
    /// Create a new `Bucketizer` bound to the given catalog.
    pub fn new(catalog: &'a RangeCatalog) -> Self {
        Self {
            catalog,
            label_offset: utc_offset(),
        }
    }

    /// Render labels at a fixed offset from UTC.
    pub fn with_label_offset(mut self, offset: FixedOffset) -> Self {
        self.label_offset = offset;
        self
    }

    /// Bucket `trades` over the catalog range `range_id`, measured back from `now`.
    ///
    /// Unknown range ids produce an empty sequence.
    pub fn bucketize<'t, I>(&self, trades: I, range_id: &str, now: DateTime<Utc>) -> Vec<BucketPoint>
    where
        I: IntoIterator<Item = &'t Trade>,
    {
        match self.catalog.get(range_id) {
            Some(range) => self.bucketize_range(trades, range, now),
            None => Vec::new(),
        }
    }

    /// Bucket `trades` over an explicit range.
    pub fn bucketize_range<'t, I>(
        &self,
        trades: I,
        range: TimeRange,
        now: DateTime<Utc>,
    ) -> Vec<BucketPoint>
    where
        I: IntoIterator<Item = &'t Trade>,
    {
        let bucket_count = range.bucket_count();
        if bucket_count == 0 {
            return Vec::new();
        }
        if bucket_count > config::MAX_BUCKETS {
            tracing::warn!(
                buckets = bucket_count,
                limit = config::MAX_BUCKETS,
                "range has too many buckets; skipping"
            );
            return Vec::new();
        }

        let now_ms = now.timestamp_millis();
        let start_ms = now_ms.saturating_sub(range.duration_ms);

        let mut buckets: Vec<Bucket> = (0..bucket_count)
            .map(|i| {
                let offset = (i as i64).saturating_mul(range.bucket_ms);
                Bucket::new(start_ms.saturating_add(offset))
            })
            .collect();

        for trade in trades {
            let Some(ts) = trade.timestamp_ms() else {
                continue;
            };
            if ts < start_ms || ts > now_ms || !trade.has_valid_stats() {
                continue;
            }

            // A trade stamped exactly `now` indexes one past the end when the
            // duration is a whole number of buckets, and is not counted.
            let idx = (ts.saturating_sub(start_ms) / range.bucket_ms) as usize;
            let Some(bucket) = buckets.get_mut(idx) else {
                continue;
            };
            bucket.add(trade.price, trade.quantity);
        }

        let date_labels = range.uses_date_labels();
        buckets
            .into_iter()
            .filter(|b| b.volume > 0)
            .map(|b| BucketPoint {
                time: self.format_label(b.start_ms, date_labels),
                avg_price: round2(b.avg_price()),
                min_price: round2(b.min_price),
                max_price: round2(b.max_price),
                volume: b.volume,
            })
            .collect()
    }

    fn format_label(&self, start_ms: i64, date_labels: bool) -> String {
        let Some(start) = self.label_offset.timestamp_millis_opt(start_ms).single() else {
            return String::new();
        };
        if date_labels {
            start.format("%d.%m").to_string()
        } else {
            start.format("%H:%M").to_string()
        }
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}
