//! Bucketing tests against a frozen clock.

mod common;

use chrono::{Duration, FixedOffset};
use market_tracker_sdk::bucketizer::round2;
use market_tracker_sdk::config::MINUTE_MS;
use market_tracker_sdk::{Bucketizer, RangeCatalog, TimeRange, Trade};

fn bucketize(trades: &[Trade], range_id: &str) -> Vec<market_tracker_sdk::BucketPoint> {
    let catalog = RangeCatalog::default();
    Bucketizer::new(&catalog).bucketize(trades, range_id, common::now())
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[test]
fn single_bucket_reports_weighted_average_min_max_and_volume() {
    let trades = vec![
        common::trade("Sword", 10.0, 2, 5),
        common::trade("Sword", 20.0, 1, 6),
    ];

    let points = bucketize(&trades, "1h");
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].avg_price, 13.33);
    assert_eq!(points[0].min_price, 10.0);
    assert_eq!(points[0].max_price, 20.0);
    assert_eq!(points[0].volume, 3);
    assert_eq!(points[0].time, "11:45");
}

#[test]
fn prices_are_rounded_to_two_decimals() {
    let trades = vec![common::trade("Sword", 10.456, 1, 5)];

    let points = bucketize(&trades, "1h");
    assert_eq!(points[0].avg_price, 10.46);
    assert_eq!(points[0].min_price, 10.46);
    assert_eq!(points[0].max_price, 10.46);
    assert_eq!(round2(2.0 / 3.0), 0.67);
}

#[test]
fn empty_buckets_are_dropped() {
    let trades = vec![
        common::trade("Sword", 10.0, 1, 55),
        common::trade("Sword", 12.0, 1, 5),
    ];

    let points = bucketize(&trades, "1h");
    let labels: Vec<&str> = points.iter().map(|p| p.time.as_str()).collect();
    assert_eq!(labels, vec!["11:00", "11:45"]);
}

#[test]
fn invalid_price_or_quantity_is_excluded() {
    let trades = vec![
        common::trade("Sword", 0.0, 5, 5),
        common::trade("Sword", 10.0, 0, 5),
        common::trade("Sword", -3.0, 2, 5),
    ];

    assert!(bucketize(&trades, "1h").is_empty());
}

#[test]
fn undated_trades_are_ignored() {
    let mut trade = common::trade("Sword", 10.0, 1, 5);
    trade.created_at = None;

    assert!(bucketize(&[trade], "1h").is_empty());
}

// ---------------------------------------------------------------------------
// Window boundaries
// ---------------------------------------------------------------------------

#[test]
fn trade_outside_range_is_ignored() {
    let trades = vec![common::trade("Sword", 10.0, 1, 120)];

    assert!(bucketize(&trades, "1h").is_empty());
    assert_eq!(bucketize(&trades, "3h").len(), 1);
}

#[test]
fn trade_at_window_start_is_included() {
    let trades = vec![common::trade("Sword", 10.0, 1, 60)];

    let points = bucketize(&trades, "1h");
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].time, "11:00");
}

#[test]
fn trade_at_now_falls_past_last_bucket() {
    let trades = vec![common::trade("Sword", 10.0, 4, 0)];

    for id in ["1h", "24h", "7d"] {
        assert!(bucketize(&trades, id).is_empty(), "range {id}");
    }
}

#[test]
fn trade_just_before_now_lands_in_last_bucket() {
    let mut trade = common::trade("Sword", 10.0, 4, 0);
    trade.created_at = Some(common::now() - Duration::milliseconds(1));

    let points = bucketize(&[trade], "1h");
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].time, "11:45");
    assert_eq!(points[0].volume, 4);
}

#[test]
fn future_trade_is_excluded() {
    let mut trade = common::trade("Sword", 10.0, 1, 0);
    trade.created_at = Some(common::now() + Duration::milliseconds(1));

    assert!(bucketize(&[trade], "1h").is_empty());
}

#[test]
fn trade_just_before_window_is_excluded() {
    let mut trade = common::trade("Sword", 10.0, 1, 0);
    trade.created_at = Some(common::now() - Duration::minutes(60) - Duration::milliseconds(1));

    assert!(bucketize(&[trade], "1h").is_empty());
}

// ---------------------------------------------------------------------------
// Ranges and labels
// ---------------------------------------------------------------------------

#[test]
fn unknown_range_yields_empty_sequence() {
    let trades = vec![common::trade("Sword", 10.0, 1, 5)];
    assert!(bucketize(&trades, "99y").is_empty());
}

#[test]
fn empty_input_yields_empty_sequence_for_every_range() {
    let catalog = RangeCatalog::default();
    for id in catalog.ids() {
        assert!(bucketize(&[], id).is_empty(), "range {id}");
    }
}

#[test]
fn long_ranges_use_date_labels() {
    let trades = vec![common::trade("Sword", 10.0, 1, 30)];

    let week = bucketize(&trades, "7d");
    assert_eq!(week.len(), 1);
    assert_eq!(week[0].time, "14.03");

    let day = bucketize(&trades, "24h");
    assert_eq!(day[0].time, "11:00");
}

#[test]
fn label_offset_shifts_labels_only() {
    let catalog = RangeCatalog::default();
    let trades = vec![common::trade("Sword", 10.0, 1, 5)];
    let offset = FixedOffset::east_opt(3 * 3600).unwrap();

    let points = Bucketizer::new(&catalog)
        .with_label_offset(offset)
        .bucketize(&trades, "1h", common::now());
    assert_eq!(points[0].time, "14:45");
    assert_eq!(points[0].volume, 1);
}

#[test]
fn uneven_range_gets_a_narrower_last_bucket() {
    let catalog = RangeCatalog::default();
    let range = TimeRange::new(100 * MINUTE_MS, 30 * MINUTE_MS);
    assert_eq!(range.bucket_count(), 4);

    let trades = vec![
        common::trade("Sword", 10.0, 1, 0),
        common::trade("Sword", 20.0, 1, 9),
        common::trade("Sword", 30.0, 1, 100),
    ];
    let points = Bucketizer::new(&catalog).bucketize_range(&trades, range, common::now());

    // Window starts at 10:20; buckets at 10:20, 10:50, 11:20, 11:50. The
    // narrow last bucket still has room for a trade at `now`.
    let labels: Vec<&str> = points.iter().map(|p| p.time.as_str()).collect();
    assert_eq!(labels, vec!["10:20", "11:50"]);
    assert_eq!(points[1].avg_price, 15.0);
}

#[test]
fn oversized_adhoc_range_yields_empty_sequence() {
    let catalog = RangeCatalog::default();
    let trades = vec![common::trade("Sword", 10.0, 1, 5)];
    let range = TimeRange::new(10_000_000_000_000, 1);

    assert!(Bucketizer::new(&catalog)
        .bucketize_range(&trades, range, common::now())
        .is_empty());
}

#[test]
fn bucketize_is_deterministic() {
    let trades = common::sample_trades();
    for id in RangeCatalog::default().ids() {
        assert_eq!(bucketize(&trades, id), bucketize(&trades, id));
    }
}
