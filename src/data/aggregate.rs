use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};

use super::model::{Metric, PostRecord, PostTable, CANONICAL_WEEK};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Mean over present values; `None` when nothing is present.
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0_f64, 0_usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Which categorical column a distribution/mean transform groups on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryColumn {
    Platform,
    PostType,
}

impl CategoryColumn {
    fn value(self, record: &PostRecord) -> &str {
        match self {
            CategoryColumn::Platform => &record.platform,
            CategoryColumn::PostType => &record.post_type,
        }
    }

    /// Distinct values in first-encountered row order.
    fn distinct(self, table: &PostTable) -> &[String] {
        match self {
            CategoryColumn::Platform => &table.platforms,
            CategoryColumn::PostType => &table.post_types,
        }
    }
}

// ---------------------------------------------------------------------------
// KPI summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct KpiSummary {
    pub total_posts: usize,
    /// Mean engagement rate over present values; `None` on an empty table.
    pub avg_engagement_rate: Option<f64>,
    /// Sum of reach, missing cells skipped.
    pub total_reach: f64,
    /// Most frequent platform; ties go to the platform seen first in row
    /// order. `None` on an empty table.
    pub top_platform: Option<String>,
}

pub fn kpi_summary(table: &PostTable) -> KpiSummary {
    let mut top: Option<(&String, usize)> = None;
    for platform in &table.platforms {
        let count = table
            .records
            .iter()
            .filter(|r| r.platform == *platform)
            .count();
        if top.map_or(true, |(_, best)| count > best) {
            top = Some((platform, count));
        }
    }

    KpiSummary {
        total_posts: table.len(),
        avg_engagement_rate: mean(table.records.iter().filter_map(|r| r.engagement_rate)),
        total_reach: table.records.iter().filter_map(|r| r.post_reach).sum(),
        top_platform: top.map(|(p, _)| p.clone()),
    }
}

// ---------------------------------------------------------------------------
// Time-series view with trailing moving average
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesParams {
    pub metric: Metric,
    /// Inclusive date range.
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Trailing window in observations, clamped to 1–30 by the UI.
    pub window: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    pub timestamp: NaiveDateTime,
    pub value: Option<f64>,
    /// Simple moving average over the last `window` observations. `None`
    /// until the window fills, and `None` whenever a missing value falls
    /// inside the window (no partial-mean fill-in).
    pub rolling_average: Option<f64>,
}

/// Rows with a parsed timestamp whose date lies in `[start, end]`, ascending
/// by timestamp, with the selected metric and its trailing moving average.
pub fn time_series(table: &PostTable, params: &TimeSeriesParams) -> Vec<TimeSeriesPoint> {
    let mut rows: Vec<(NaiveDateTime, Option<f64>)> = table
        .records
        .iter()
        .filter_map(|r| {
            let ts = r.post_datetime?;
            let date = ts.date();
            (date >= params.start && date <= params.end).then(|| (ts, params.metric.value(r)))
        })
        .collect();
    rows.sort_by_key(|&(ts, _)| ts);

    let window = params.window.max(1);
    rows.iter()
        .enumerate()
        .map(|(i, &(timestamp, value))| {
            let rolling_average = if i + 1 < window {
                None
            } else {
                mean_of_complete_window(&rows[i + 1 - window..=i])
            };
            TimeSeriesPoint {
                timestamp,
                value,
                rolling_average,
            }
        })
        .collect()
}

fn mean_of_complete_window(window: &[(NaiveDateTime, Option<f64>)]) -> Option<f64> {
    let mut sum = 0.0;
    for &(_, value) in window {
        sum += value?;
    }
    Some(sum / window.len() as f64)
}

// ---------------------------------------------------------------------------
// Categorical distribution and per-category engagement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Post count per selected category value. Descending by count (render
/// order only, not a contract); an empty selection yields an empty result.
pub fn category_distribution(
    table: &PostTable,
    column: CategoryColumn,
    selected: &BTreeSet<String>,
) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = column
        .distinct(table)
        .iter()
        .filter(|value| selected.contains(*value))
        .map(|value| CategoryCount {
            category: value.clone(),
            count: table
                .records
                .iter()
                .filter(|r| column.value(r) == value)
                .count(),
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMean {
    pub category: String,
    pub mean_engagement: Option<f64>,
}

/// Mean engagement rate per selected category value, in first-encountered
/// category order.
pub fn category_engagement(
    table: &PostTable,
    column: CategoryColumn,
    selected: &BTreeSet<String>,
) -> Vec<CategoryMean> {
    column
        .distinct(table)
        .iter()
        .filter(|value| selected.contains(*value))
        .map(|value| CategoryMean {
            category: value.clone(),
            mean_engagement: mean(
                table
                    .records
                    .iter()
                    .filter(|r| column.value(r) == value)
                    .filter_map(|r| r.engagement_rate),
            ),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Scatter projection (filter only, no aggregation)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub post_id: i64,
    pub platform: String,
    pub post_type: String,
    pub content_length: Option<f64>,
    pub engagement_rate: Option<f64>,
    pub post_reach: Option<f64>,
}

/// Per-row projection for the engagement-vs-content-length scatter, limited
/// to the selected platforms.
pub fn scatter_points(table: &PostTable, platforms: &BTreeSet<String>) -> Vec<ScatterPoint> {
    table
        .records
        .iter()
        .filter(|r| platforms.contains(&r.platform))
        .map(|r| ScatterPoint {
            post_id: r.post_id,
            platform: r.platform.clone(),
            post_type: r.post_type.clone(),
            content_length: r.content_length,
            engagement_rate: r.engagement_rate,
            post_reach: r.post_reach,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Hashtag impact
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HashtagImpact {
    pub num_hashtags: u32,
    pub mean_engagement: Option<f64>,
}

/// Mean engagement rate per hashtag count over rows with
/// `num_hashtags <= max_hashtags`, ascending by count. Only counts present
/// in the filtered rows appear.
pub fn hashtag_impact(table: &PostTable, max_hashtags: u32) -> Vec<HashtagImpact> {
    let counts: BTreeSet<u32> = table
        .records
        .iter()
        .map(|r| r.num_hashtags)
        .filter(|&n| n <= max_hashtags)
        .collect();

    counts
        .into_iter()
        .map(|n| HashtagImpact {
            num_hashtags: n,
            mean_engagement: mean(
                table
                    .records
                    .iter()
                    .filter(|r| r.num_hashtags == n)
                    .filter_map(|r| r.engagement_rate),
            ),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Day-of-week performance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DayPerformance {
    pub day: &'static str,
    pub mean_engagement: Option<f64>,
}

/// Mean engagement rate per day of week over the whole table, always seven
/// entries Monday→Sunday; days absent from the data get `None` rather than
/// being dropped. Groups on the source's `day_of_week` column as-is.
pub fn day_of_week_performance(table: &PostTable) -> Vec<DayPerformance> {
    CANONICAL_WEEK
        .iter()
        .map(|&day| DayPerformance {
            day,
            mean_engagement: mean(
                table
                    .records
                    .iter()
                    .filter(|r| r.day_of_week == day)
                    .filter_map(|r| r.engagement_rate),
            ),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Paid vs organic comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PromotionGroup {
    /// "Organic" or "Paid".
    pub label: &'static str,
    pub likes: Option<f64>,
    pub comments: Option<f64>,
    pub shares: Option<f64>,
    pub engagement_rate: Option<f64>,
}

/// Mean of likes, comments, shares and engagement rate per promotion flag.
/// Organic first; a flag with no rows is omitted.
pub fn paid_vs_organic(table: &PostTable) -> Vec<PromotionGroup> {
    [(false, "Organic"), (true, "Paid")]
        .into_iter()
        .filter_map(|(flag, label)| {
            let rows: Vec<&PostRecord> = table
                .records
                .iter()
                .filter(|r| r.is_paid_promotion == flag)
                .collect();
            if rows.is_empty() {
                return None;
            }
            Some(PromotionGroup {
                label,
                likes: mean(rows.iter().filter_map(|r| r.likes)),
                comments: mean(rows.iter().filter_map(|r| r.comments)),
                shares: mean(rows.iter().filter_map(|r| r.shares)),
                engagement_rate: mean(rows.iter().filter_map(|r| r.engagement_rate)),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Top-N ranking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TopPost {
    pub post_id: i64,
    pub platform: String,
    pub post_type: String,
    pub engagement_rate: Option<f64>,
    pub post_reach: Option<f64>,
    pub likes: Option<f64>,
    pub comments: Option<f64>,
    pub shares: Option<f64>,
}

/// The `min(n, len)` posts with the largest engagement rate. The sort is
/// stable, so ties keep their original row order; a missing rate ranks below
/// every present one.
pub fn top_posts(table: &PostTable, n: usize) -> Vec<TopPost> {
    let rate = |i: usize| {
        table.records[i]
            .engagement_rate
            .unwrap_or(f64::NEG_INFINITY)
    };

    let mut indices: Vec<usize> = (0..table.len()).collect();
    indices.sort_by(|&a, &b| rate(b).total_cmp(&rate(a)));
    indices.truncate(n);

    indices
        .into_iter()
        .map(|i| {
            let r = &table.records[i];
            TopPost {
                post_id: r.post_id,
                platform: r.platform.clone(),
                post_type: r.post_type.clone(),
                engagement_rate: r.engagement_rate,
                post_reach: r.post_reach,
                likes: r.likes,
                comments: r.comments,
                shares: r.shares,
            }
        })
        .collect()
}
