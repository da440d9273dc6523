use std::fmt;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// Metric – the numeric columns selectable for the time-series view
// ---------------------------------------------------------------------------

/// One of the five plottable per-post metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    PostReach,
    EngagementRate,
    Likes,
    Comments,
    Shares,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::PostReach,
        Metric::EngagementRate,
        Metric::Likes,
        Metric::Comments,
        Metric::Shares,
    ];

    /// Human-readable label for chart axes and selectors.
    pub fn label(self) -> &'static str {
        match self {
            Metric::PostReach => "Post Reach",
            Metric::EngagementRate => "Engagement Rate",
            Metric::Likes => "Likes",
            Metric::Comments => "Comments",
            Metric::Shares => "Shares",
        }
    }

    /// Read this metric's value from a record.
    pub fn value(self, record: &PostRecord) -> Option<f64> {
        match self {
            Metric::PostReach => record.post_reach,
            Metric::EngagementRate => record.engagement_rate,
            Metric::Likes => record.likes,
            Metric::Comments => record.comments,
            Metric::Shares => record.shares,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical week order used by the day-of-week view.
pub const CANONICAL_WEEK: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

// ---------------------------------------------------------------------------
// PostRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single social-media post (one row of the source CSV), fully coerced.
///
/// Numeric metrics are `Option<f64>`: a cell that failed numeric coercion is
/// `None` and is skipped by mean/sum aggregations. Likewise an unparsable
/// `post_datetime` is `None` rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub post_id: i64,
    pub platform: String,
    pub post_type: String,
    pub is_paid_promotion: bool,
    pub num_hashtags: u32,
    pub post_datetime: Option<NaiveDateTime>,
    /// Supplied by the source file as its own column, never derived from
    /// `post_datetime`. The synthetic fallback cycles it independently of the
    /// synthesized timestamps, so the two can disagree there.
    pub day_of_week: String,
    pub post_reach: Option<f64>,
    pub likes: Option<f64>,
    pub comments: Option<f64>,
    pub shares: Option<f64>,
    pub saves: Option<f64>,
    pub content_length: Option<f64>,
    pub watch_time: Option<f64>,
    pub engagement_rate: Option<f64>,
}

impl PostRecord {
    /// Calendar date of the post, if the timestamp parsed.
    pub fn date(&self) -> Option<NaiveDate> {
        self.post_datetime.map(|ts| ts.date())
    }

    /// String form of every column, in schema order. Missing cells render as
    /// the empty string. Used by the free-text search.
    pub fn cells(&self) -> [String; 15] {
        [
            self.post_id.to_string(),
            self.platform.clone(),
            self.post_type.clone(),
            self.is_paid_promotion.to_string(),
            self.num_hashtags.to_string(),
            self.post_datetime
                .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            self.day_of_week.clone(),
            fmt_cell(self.post_reach),
            fmt_cell(self.likes),
            fmt_cell(self.comments),
            fmt_cell(self.shares),
            fmt_cell(self.saves),
            fmt_cell(self.content_length),
            fmt_cell(self.watch_time),
            fmt_cell(self.engagement_rate),
        ]
    }
}

fn fmt_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// PostTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Where a table came from. `Synthetic` drives the fallback advisory in the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Synthetic,
}

/// The immutable snapshot of all loaded posts, with pre-computed lists of
/// distinct platforms and post types in first-encountered row order.
///
/// Constructed once per backing file and passed by reference to every
/// transform; filtering produces index lists or derived tables, never
/// mutations of this snapshot.
#[derive(Debug, Clone)]
pub struct PostTable {
    pub records: Vec<PostRecord>,
    pub platforms: Vec<String>,
    pub post_types: Vec<String>,
    pub source: DataSource,
}

impl PostTable {
    /// Build the distinct-value indices from the loaded records.
    pub fn from_records(records: Vec<PostRecord>, source: DataSource) -> Self {
        let mut platforms: Vec<String> = Vec::new();
        let mut post_types: Vec<String> = Vec::new();

        for rec in &records {
            if !platforms.contains(&rec.platform) {
                platforms.push(rec.platform.clone());
            }
            if !post_types.contains(&rec.post_type) {
                post_types.push(rec.post_type.clone());
            }
        }

        PostTable {
            records,
            platforms,
            post_types,
            source,
        }
    }

    /// Number of posts.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest post dates among records with a parsed timestamp.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.records.iter().filter_map(PostRecord::date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(min, max), d| (min.min(d), max.max(d))))
    }

    /// Largest hashtag count in the table (0 when empty).
    pub fn max_hashtags(&self) -> u32 {
        self.records
            .iter()
            .map(|r| r.num_hashtags)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64) -> PostRecord {
        PostRecord {
            post_id: id,
            platform: "Twitter".into(),
            post_type: "image".into(),
            is_paid_promotion: false,
            num_hashtags: 2,
            post_datetime: NaiveDate::from_ymd_opt(2023, 3, 14)
                .map(|d| d.and_hms_opt(9, 26, 53))
                .flatten(),
            day_of_week: "Tuesday".into(),
            post_reach: Some(1500.0),
            likes: None,
            comments: Some(12.0),
            shares: Some(3.0),
            saves: Some(1.0),
            content_length: Some(120.0),
            watch_time: None,
            engagement_rate: Some(4.2),
        }
    }

    #[test]
    fn distinct_values_keep_row_order() {
        let mut a = record(1);
        a.platform = "LinkedIn".into();
        let mut b = record(2);
        b.platform = "Facebook".into();
        let c = record(3); // Twitter
        let mut d = record(4);
        d.platform = "Facebook".into();

        let table = PostTable::from_records(vec![a, b, c, d], DataSource::Synthetic);
        assert_eq!(table.platforms, vec!["LinkedIn", "Facebook", "Twitter"]);
        assert_eq!(table.post_types, vec!["image"]);
    }

    #[test]
    fn cells_render_missing_as_empty() {
        let cells = record(7).cells();
        assert_eq!(cells[0], "7");
        assert_eq!(cells[5], "2023-03-14 09:26:53");
        assert_eq!(cells[8], ""); // likes is None
        assert_eq!(cells[14], "4.2");
    }

    #[test]
    fn date_span_skips_unparsed_timestamps() {
        let mut a = record(1);
        a.post_datetime = None;
        let b = record(2);
        let table = PostTable::from_records(vec![a, b], DataSource::Synthetic);
        let (min, max) = table.date_span().unwrap();
        assert_eq!(min, NaiveDate::from_ymd_opt(2023, 3, 14).unwrap());
        assert_eq!(min, max);
    }

    #[test]
    fn metric_reads_the_matching_column() {
        let rec = record(1);
        assert_eq!(Metric::PostReach.value(&rec), Some(1500.0));
        assert_eq!(Metric::Likes.value(&rec), None);
        assert_eq!(Metric::EngagementRate.value(&rec), Some(4.2));
    }
}
