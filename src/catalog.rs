//! Range catalog: named lookback windows and their bucket widths.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::{self, RangeCfg};
use crate::error::{Result, TrackerError};

// ---------------------------------------------------------------------------
// TimeRange
// ---------------------------------------------------------------------------

/// A lookback duration split into fixed-width buckets, both in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub duration_ms: i64,
    pub bucket_ms: i64,
}

impl TimeRange {
    pub const fn new(duration_ms: i64, bucket_ms: i64) -> Self {
        Self {
            duration_ms,
            bucket_ms,
        }
    }

    /// `ceil(duration / bucket)`; the last bucket may be narrower than the rest.
    pub fn bucket_count(&self) -> usize {
        if self.duration_ms <= 0 || self.bucket_ms <= 0 {
            return 0;
        }
        let whole = self.duration_ms / self.bucket_ms;
        let partial = i64::from(self.duration_ms % self.bucket_ms != 0);
        (whole + partial) as usize
    }

    /// Whether points in this range are labelled by date rather than time of day.
    pub fn uses_date_labels(&self) -> bool {
        self.duration_ms >= config::DATE_LABEL_MIN_MS
    }
}

// ---------------------------------------------------------------------------
// RangeCatalog
// ---------------------------------------------------------------------------

/// Read-only table of supported ranges, iterated in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeCatalog {
    ranges: IndexMap<String, TimeRange>,
}

impl Default for RangeCatalog {
    fn default() -> Self {
        let ranges = config::default_ranges()
            .into_iter()
            .map(|r| (r.id, TimeRange::new(r.duration_ms, r.bucket_ms)))
            .collect();
        Self { ranges }
    }
}

impl RangeCatalog {
    /// Build a catalog from configured ranges.
    ///
    /// Ids are trimmed and must be non-empty and unique; durations and bucket
    /// widths must be positive, and a range may not exceed
    /// [`MAX_BUCKETS`](config::MAX_BUCKETS) buckets.
    pub fn from_config(cfgs: &[RangeCfg]) -> Result<Self> {
        let mut ranges = IndexMap::with_capacity(cfgs.len());
        let mut seen = HashSet::new();

        for cfg in cfgs {
            let id = cfg.id.trim();
            if id.is_empty() {
                return Err(TrackerError::InvalidConfig(
                    "range id cannot be empty after trimming".into(),
                ));
            }
            if !seen.insert(id.to_string()) {
                return Err(TrackerError::InvalidConfig(format!(
                    "duplicate range id: {id}"
                )));
            }
            if cfg.duration_ms <= 0 || cfg.bucket_ms <= 0 {
                return Err(TrackerError::InvalidConfig(format!(
                    "range {id} needs a positive duration and bucket width, got {} / {}",
                    cfg.duration_ms, cfg.bucket_ms
                )));
            }
            let range = TimeRange::new(cfg.duration_ms, cfg.bucket_ms);
            if range.bucket_count() > config::MAX_BUCKETS {
                return Err(TrackerError::InvalidConfig(format!(
                    "range {id} splits into {} buckets, more than the limit of {}",
                    range.bucket_count(),
                    config::MAX_BUCKETS
                )));
            }
            ranges.insert(id.to_string(), range);
        }

        Ok(Self { ranges })
    }

    /// Look up a range. Unknown ids yield `None`, never an error.
    pub fn get(&self, id: &str) -> Option<TimeRange> {
        self.ranges.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ranges.contains_key(id)
    }

    /// Range ids in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ranges.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TimeRange)> {
        self.ranges.iter().map(|(id, r)| (id.as_str(), *r))
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
