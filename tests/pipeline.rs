//! End-to-end checks of the aggregation pipeline over the deterministic
//! synthetic table (the loader's 100-row fallback).

use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDate;

use pulseboard::data::aggregate::{
    self, CategoryColumn, TimeSeriesParams,
};
use pulseboard::data::filter::search_indices;
use pulseboard::data::loader;
use pulseboard::data::model::{DataSource, Metric};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn missing_source_yields_the_synthetic_table_not_an_error() {
    let table = loader::load(Path::new("/nowhere/posts.csv"));
    assert_eq!(table.source, DataSource::Synthetic);
    assert_eq!(table.len(), 100);
}

#[test]
fn time_series_row_count_matches_the_date_range_for_every_metric() {
    let table = loader::synthetic(Some(11));
    // Synthetic posts run one per day from 2023-01-01; 2023-01-10..=2023-01-19
    // covers exactly ten of them.
    for metric in Metric::ALL {
        let series = aggregate::time_series(
            &table,
            &TimeSeriesParams {
                metric,
                start: date(2023, 1, 10),
                end: date(2023, 1, 19),
                window: 7,
            },
        );
        assert_eq!(series.len(), 10);
    }
}

#[test]
fn rolling_average_matches_a_hand_computed_window() {
    let table = loader::synthetic(Some(11));
    let window = 5;
    let series = aggregate::time_series(
        &table,
        &TimeSeriesParams {
            metric: Metric::Likes,
            start: date(2023, 1, 1),
            end: date(2023, 4, 10),
            window,
        },
    );
    assert_eq!(series.len(), 100);

    for (i, point) in series.iter().enumerate() {
        if i + 1 < window {
            assert_eq!(point.rolling_average, None);
        } else {
            let expected: f64 = series[i + 1 - window..=i]
                .iter()
                .map(|p| p.value.unwrap())
                .sum::<f64>()
                / window as f64;
            let got = point.rolling_average.unwrap();
            assert!((got - expected).abs() < 1e-9);
        }
    }
}

#[test]
fn distribution_over_the_full_platform_set_sums_to_the_table_size() {
    let table = loader::synthetic(Some(11));
    let all: BTreeSet<String> = table.platforms.iter().cloned().collect();
    let counts = aggregate::category_distribution(&table, CategoryColumn::Platform, &all);
    assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), table.len());
    // Per-category engagement covers the same four platforms.
    let means = aggregate::category_engagement(&table, CategoryColumn::Platform, &all);
    assert_eq!(means.len(), 4);
    assert!(means.iter().all(|m| m.mean_engagement.is_some()));
}

#[test]
fn hashtag_impact_on_the_synthetic_cycle() {
    // Hashtag counts cycle 0–5, so a threshold of 3 keeps exactly {0,1,2,3}.
    let table = loader::synthetic(Some(11));
    let impact = aggregate::hashtag_impact(&table, 3);
    let groups: Vec<u32> = impact.iter().map(|g| g.num_hashtags).collect();
    assert_eq!(groups, vec![0, 1, 2, 3]);
    assert!(impact.iter().all(|g| g.mean_engagement.is_some()));
}

#[test]
fn day_of_week_is_always_the_full_week_in_order() {
    let table = loader::synthetic(Some(11));
    let days = aggregate::day_of_week_performance(&table);
    let names: Vec<&str> = days.iter().map(|d| d.day).collect();
    assert_eq!(
        names,
        vec![
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
            "Sunday"
        ]
    );
}

#[test]
fn paid_vs_organic_covers_both_halves_of_the_synthetic_split() {
    let table = loader::synthetic(Some(11));
    let groups = aggregate::paid_vs_organic(&table);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].label, "Organic");
    assert_eq!(groups[1].label, "Paid");
    for g in &groups {
        assert!(g.likes.is_some());
        assert!(g.engagement_rate.is_some());
    }
}

#[test]
fn top_posts_dominate_the_rest_of_the_table() {
    let table = loader::synthetic(Some(11));
    let top = aggregate::top_posts(&table, 10);
    assert_eq!(top.len(), 10);

    let kept: BTreeSet<i64> = top.iter().map(|p| p.post_id).collect();
    let floor = top
        .iter()
        .filter_map(|p| p.engagement_rate)
        .fold(f64::INFINITY, f64::min);
    for rec in &table.records {
        if !kept.contains(&rec.post_id) {
            assert!(rec.engagement_rate.unwrap() <= floor);
        }
    }
}

#[test]
fn search_term_behaviour_matches_the_contract() {
    let table = loader::synthetic(Some(11));

    // Empty term: identity, same rows in the same order.
    assert_eq!(
        search_indices(&table, ""),
        (0..table.len()).collect::<Vec<_>>()
    );

    // Case-insensitive substring across any column.
    let hits = search_indices(&table, "instagram");
    assert_eq!(hits.len(), 25);

    // No match: empty, not an error.
    assert!(search_indices(&table, "tiktok").is_empty());
}

#[test]
fn kpi_summary_over_the_synthetic_table() {
    let table = loader::synthetic(Some(11));
    let kpi = aggregate::kpi_summary(&table);
    assert_eq!(kpi.total_posts, 100);
    let avg = kpi.avg_engagement_rate.unwrap();
    assert!((1.0..10.0).contains(&avg));
    assert!(kpi.total_reach >= 100_000.0); // 100 rows, reach ≥ 1000 each
    assert_eq!(kpi.top_platform.as_deref(), Some("Twitter")); // 25-way tie, first in row order
}
