//! Async wrapper around [`MarketTracker`] for use in async runtimes (Tokio, etc.).
//!
//! Aggregating a large trade set is CPU-bound, so every operation runs on the
//! blocking thread pool via [`tokio::task::spawn_blocking`], keeping the async
//! event loop free.
//!
//! # Example
//!
//! ```no_run
//! use market_tracker_sdk::{AsyncMarketTracker, MarketTracker};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let tracker = AsyncMarketTracker::new(MarketTracker::builder().build().unwrap());
//!
//!     let items = tracker.aggregate(Vec::new()).await.unwrap();
//!     assert!(items.is_empty());
//! }
//! ```

use std::sync::Arc;

use crate::error::{Result, TrackerError};
use crate::models::{BucketPoint, ItemAggregate, MarketView, Trade};
use crate::{CurrencySelection, MarketTracker};

/// Async wrapper around [`MarketTracker`].
///
/// The tracker holds no mutable state, so it is shared behind an [`Arc`]
/// without locking.
#[derive(Debug, Clone)]
pub struct AsyncMarketTracker {
    inner: Arc<MarketTracker>,
}

impl AsyncMarketTracker {
    pub fn new(tracker: MarketTracker) -> Self {
        Self {
            inner: Arc::new(tracker),
        }
    }

    /// Run a sync tracker operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&MarketTracker) -> T + Send + 'static,
        T: Send + 'static,
    {
        let tracker = self.inner.clone();
        tokio::task::spawn_blocking(move || f(&tracker))
            .await
            .map_err(|e| TrackerError::Runtime(format!("Task join error: {e}")))
    }

    /// Chart points for one range.
    pub async fn bucketize(&self, trades: Vec<Trade>, range_id: &str) -> Result<Vec<BucketPoint>> {
        let range_id = range_id.to_string();
        self.run(move |t| t.bucketize(&trades, &range_id)).await
    }

    /// Per-item summaries over every range.
    pub async fn aggregate(&self, trades: Vec<Trade>) -> Result<Vec<ItemAggregate>> {
        self.run(move |t| t.aggregate(&trades)).await
    }

    /// Auto-select, partition and aggregate in one blocking task.
    pub async fn summarize(
        &self,
        trades: Vec<Trade>,
        selection: CurrencySelection,
    ) -> Result<MarketView> {
        self.run(move |t| t.summarize(&trades, &selection)).await
    }

    /// Return a reference to the wrapped tracker.
    pub fn tracker(&self) -> &MarketTracker {
        &self.inner
    }
}
