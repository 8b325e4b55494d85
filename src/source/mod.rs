//! Trade sources and the live-or-demo load policy.
//!
//! The aggregation engine never fetches anything itself. A [`TradeSource`]
//! hands it raw [`TradeRecord`]s; [`load_with_fallback`] decides whether the
//! caller sees live data or generated demo data.

pub mod demo;
pub mod file;

pub use demo::DemoSource;
pub use file::JsonFileSource;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::TradeRecord;

/// Anything that can deliver a batch of raw trade records.
pub trait TradeSource {
    /// Short name used in log events.
    fn name(&self) -> &str;

    fn fetch(&self) -> Result<Vec<TradeRecord>>;
}

/// Where a loaded batch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    Live,
    Demo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTrades {
    pub records: Vec<TradeRecord>,
    pub origin: DataOrigin,
    /// Set when the live source failed, for the caller to surface.
    pub warning: Option<String>,
}

impl LoadedTrades {
    pub fn is_demo(&self) -> bool {
        self.origin == DataOrigin::Demo
    }
}

/// Fetch from `live`; fall back to `demo` when it fails or returns nothing.
///
/// An empty live result falls back silently. A failure also carries a
/// warning. If the demo source fails too the batch is empty.
pub fn load_with_fallback(live: &dyn TradeSource, demo: &dyn TradeSource) -> LoadedTrades {
    let warning = match live.fetch() {
        Ok(records) if !records.is_empty() => {
            tracing::info!(source = live.name(), count = records.len(), "loaded live trades");
            return LoadedTrades {
                records,
                origin: DataOrigin::Live,
                warning: None,
            };
        }
        Ok(_) => {
            tracing::info!(source = live.name(), "live source is empty; using demo trades");
            None
        }
        Err(e) => {
            tracing::warn!(source = live.name(), error = %e, "live source failed; using demo trades");
            Some(format!(
                "Could not load trades from {}; showing demo data. ({e})",
                live.name()
            ))
        }
    };

    let records = demo.fetch().unwrap_or_else(|e| {
        tracing::warn!(source = demo.name(), error = %e, "demo source failed");
        Vec::new()
    });

    LoadedTrades {
        records,
        origin: DataOrigin::Demo,
        warning,
    }
}
