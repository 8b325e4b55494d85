//! Range catalog and config loading tests.

use std::io::Write;

use market_tracker_sdk::config::{
    self, load_config_path, load_config_str, RangeCfg, DAY_MS, HOUR_MS, MAX_BUCKETS, MINUTE_MS,
};
use market_tracker_sdk::{MarketTracker, RangeCatalog, TimeRange, TrackerConfig, TrackerError};
use tempfile::NamedTempFile;

// ---------------------------------------------------------------------------
// Default catalog
// ---------------------------------------------------------------------------

#[test]
fn default_catalog_lists_ranges_in_order() {
    let catalog = RangeCatalog::default();
    let ids: Vec<&str> = catalog.ids().collect();
    assert_eq!(
        ids,
        vec!["1h", "2h", "3h", "6h", "12h", "24h", "3d", "7d", "14d", "30d"]
    );
}

#[test]
fn default_catalog_bucket_widths() {
    let catalog = RangeCatalog::default();
    assert_eq!(catalog.get("1h"), Some(TimeRange::new(HOUR_MS, 15 * MINUTE_MS)));
    assert_eq!(catalog.get("3h").unwrap().bucket_count(), 6);
    assert_eq!(catalog.get("24h").unwrap().bucket_count(), 24);
    assert_eq!(catalog.get("3d").unwrap().bucket_ms, 6 * HOUR_MS);
    assert_eq!(catalog.get("30d").unwrap().bucket_count(), 30);
    assert_eq!(catalog.get("99y"), None);
}

#[test]
fn date_labels_start_at_seven_days() {
    let catalog = RangeCatalog::default();
    assert!(!catalog.get("3d").unwrap().uses_date_labels());
    assert!(catalog.get("7d").unwrap().uses_date_labels());
    assert!(catalog.get("30d").unwrap().uses_date_labels());
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn catalog_rejects_duplicate_ids() {
    let cfgs = vec![RangeCfg::new("1h", HOUR_MS, MINUTE_MS), RangeCfg::new(" 1h ", HOUR_MS, MINUTE_MS)];
    let err = RangeCatalog::from_config(&cfgs).unwrap_err();
    assert!(matches!(err, TrackerError::InvalidConfig(_)));
}

#[test]
fn catalog_rejects_non_positive_widths() {
    assert!(RangeCatalog::from_config(&[RangeCfg::new("x", 0, MINUTE_MS)]).is_err());
    assert!(RangeCatalog::from_config(&[RangeCfg::new("x", HOUR_MS, -1)]).is_err());
    assert!(RangeCatalog::from_config(&[RangeCfg::new("  ", HOUR_MS, MINUTE_MS)]).is_err());
}

#[test]
fn catalog_rejects_too_many_buckets() {
    let err = RangeCatalog::from_config(&[RangeCfg::new("huge", 10_000_000_000_000, 1)]).unwrap_err();
    assert!(matches!(err, TrackerError::InvalidConfig(_)));

    let at_limit = RangeCfg::new("max", MAX_BUCKETS as i64 * MINUTE_MS, MINUTE_MS);
    assert!(RangeCatalog::from_config(&[at_limit]).is_ok());

    let over_limit = RangeCfg::new("over", (MAX_BUCKETS as i64 + 1) * MINUTE_MS, MINUTE_MS);
    assert!(RangeCatalog::from_config(&[over_limit]).is_err());
}

#[test]
fn oversized_config_fails_at_build() {
    let cfg = load_config_str(r#"{"ranges": [{"id": "x", "durationMs": 10000000000000, "bucketMs": 1}]}"#).unwrap();
    let err = MarketTracker::builder().config(cfg).build().unwrap_err();
    assert!(matches!(err, TrackerError::InvalidConfig(_)));
}

#[test]
fn bucket_count_handles_extreme_widths() {
    assert_eq!(TimeRange::new(i64::MAX, i64::MAX).bucket_count(), 1);
    assert_eq!(TimeRange::new(i64::MAX, i64::MAX - 1).bucket_count(), 2);
}

#[test]
fn catalog_from_default_config_matches_default() {
    let catalog = RangeCatalog::from_config(&config::default_ranges()).unwrap();
    assert_eq!(catalog, RangeCatalog::default());
    assert_eq!(catalog.len(), 10);
}

// ---------------------------------------------------------------------------
// JSON loading
// ---------------------------------------------------------------------------

#[test]
fn empty_json_object_uses_defaults() {
    let cfg = load_config_str("{}").unwrap();
    assert_eq!(cfg, TrackerConfig::default());
}

#[test]
fn json_config_overrides_ranges() {
    let cfg = load_config_str(&format!(
        r#"{{"ranges": [{{"id": "90d", "durationMs": {}, "bucketMs": {}}}]}}"#,
        90 * DAY_MS,
        7 * DAY_MS
    ))
    .unwrap();

    let tracker = MarketTracker::builder().config(cfg).build().unwrap();
    let ids: Vec<&str> = tracker.catalog().ids().collect();
    assert_eq!(ids, vec!["90d"]);
    assert_eq!(tracker.catalog().get("90d").unwrap().bucket_count(), 13);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = load_config_str(r#"{"rangez": []}"#).unwrap_err();
    assert!(matches!(err, TrackerError::Json(_)));
}

#[test]
fn invalid_config_fails_at_build() {
    let cfg = load_config_str(r#"{"defaultCurrency": "gold"}"#).unwrap();
    let err = MarketTracker::builder().config(cfg).build().unwrap_err();
    assert!(matches!(err, TrackerError::InvalidConfig(_)));
}

#[test]
fn config_loads_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"currencies": {{"adena": ["gold"]}}, "defaultCurrency": "adena"}}"#
    )
    .unwrap();
    file.flush().unwrap();

    let cfg = load_config_path(file.path()).unwrap();
    let tracker = MarketTracker::builder().config(cfg).build().unwrap();
    assert_eq!(tracker.normalize_currency("Gold").id(), "adena");
    assert_eq!(tracker.normalize_currency("mastercoin").id(), "mastercoin");
}

#[test]
fn missing_config_file_is_not_found() {
    let err = load_config_path("/nonexistent/tracker.json").unwrap_err();
    assert!(matches!(err, TrackerError::NotFound(_)));
}
