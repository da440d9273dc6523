use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use thiserror::Error;

use super::model::{DataSource, PostRecord, PostTable, CANONICAL_WEEK};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Loading the backing file can fail as a whole; individual cells cannot.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{path} row {row}: {source}")]
    Malformed {
        path: PathBuf,
        row: usize,
        #[source]
        source: csv::Error,
    },
}

/// Load the dashboard's backing CSV. Total: if the file is missing or
/// malformed, logs a warning and substitutes a synthetic 100-row table
/// (the table's `DataSource::Synthetic` marks it for the UI advisory).
pub fn load(path: &Path) -> PostTable {
    match read_csv(path) {
        Ok(table) => {
            log::info!("loaded {} posts from {}", table.len(), path.display());
            table
        }
        Err(e) => {
            log::warn!("{e}; using synthetic sample data instead");
            synthetic(None)
        }
    }
}

/// Strict CSV load used by File → Open, where a failure is surfaced to the
/// user instead of silently swapped for sample data.
pub fn read_csv(path: &Path) -> Result<PostTable, LoadError> {
    let mut reader =
        csv::Reader::from_path(path).map_err(|source| LoadError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

    let mut records = Vec::new();
    for (row, result) in reader.deserialize::<RawRow>().enumerate() {
        let raw = result.map_err(|source| LoadError::Malformed {
            path: path.to_path_buf(),
            row,
            source,
        })?;
        records.push(raw.coerce());
    }

    Ok(PostTable::from_records(
        records,
        DataSource::File(path.to_path_buf()),
    ))
}

// ---------------------------------------------------------------------------
// CSV row coercion
// ---------------------------------------------------------------------------

/// Raw CSV row: every field read as text so that per-cell coercion failures
/// become nulls instead of deserialization errors. A missing column is still
/// a hard `Malformed` error (the schema is fixed).
#[derive(Debug, Deserialize)]
struct RawRow {
    post_id: String,
    platform: String,
    post_type: String,
    is_paid_promotion: String,
    num_hashtags: String,
    post_datetime: String,
    day_of_week: String,
    post_reach: String,
    likes: String,
    comments: String,
    shares: String,
    saves: String,
    content_length: String,
    watch_time: String,
    engagement_rate: String,
}

impl RawRow {
    fn coerce(self) -> PostRecord {
        PostRecord {
            post_id: self.post_id.trim().parse().unwrap_or(0),
            platform: self.platform.trim().to_string(),
            post_type: self.post_type.trim().to_string(),
            is_paid_promotion: parse_bool(&self.is_paid_promotion),
            num_hashtags: self.num_hashtags.trim().parse().unwrap_or(0),
            post_datetime: parse_datetime(&self.post_datetime),
            day_of_week: self.day_of_week.trim().to_string(),
            post_reach: parse_number(&self.post_reach),
            likes: parse_number(&self.likes),
            comments: parse_number(&self.comments),
            shares: parse_number(&self.shares),
            saves: parse_number(&self.saves),
            content_length: parse_number(&self.content_length),
            watch_time: parse_number(&self.watch_time),
            engagement_rate: parse_number(&self.engagement_rate),
        }
    }
}

/// Timestamp coercion: try the common layouts, fall back to a bare date at
/// midnight. Anything else is null, never an error.
fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    const LAYOUTS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%m/%d/%Y %H:%M",
    ];
    for layout in LAYOUTS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Numeric coercion: non-numeric (or non-finite) text is null.
fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Boolean-like text: `true`/`1`/`yes` (case-insensitive) is true,
/// everything else false.
fn parse_bool(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

// ---------------------------------------------------------------------------
// Synthetic fallback table
// ---------------------------------------------------------------------------

const FALLBACK_ROWS: usize = 100;
const FALLBACK_PLATFORMS: [&str; 4] = ["Twitter", "Facebook", "Instagram", "LinkedIn"];
const FALLBACK_POST_TYPES: [&str; 4] = ["image", "video", "text", "link"];

/// Build the 100-row synthetic fallback table.
///
/// Shape is fixed: platforms and post types cycle with period 4, the paid
/// flag alternates, hashtag counts cycle 0–5, one post per day starting at
/// 2023-01-01, `day_of_week` cycles Monday…Sunday on its own (so it drifts
/// from the synthesized timestamps; the source file's column is trusted the
/// same way, with no cross-check). Numeric values are drawn from fixed
/// uniform ranges; pass a seed for reproducible values in tests.
pub fn synthetic(seed: Option<u64>) -> PostTable {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };
    let epoch = NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid epoch date");

    let records = (0..FALLBACK_ROWS)
        .map(|i| {
            let date = epoch + Days::new(i as u64);
            PostRecord {
                post_id: i as i64 + 1,
                platform: FALLBACK_PLATFORMS[i % 4].to_string(),
                post_type: FALLBACK_POST_TYPES[i % 4].to_string(),
                is_paid_promotion: i % 2 == 0,
                num_hashtags: (i % 6) as u32,
                post_datetime: Some(date.and_time(NaiveTime::MIN)),
                day_of_week: CANONICAL_WEEK[i % 7].to_string(),
                post_reach: Some(rng.random_range(1000..10000) as f64),
                likes: Some(rng.random_range(50..500) as f64),
                comments: Some(rng.random_range(10..100) as f64),
                shares: Some(rng.random_range(5..50) as f64),
                saves: Some(rng.random_range(0..20) as f64),
                content_length: Some(rng.random_range(50..500) as f64),
                watch_time: Some(rng.random_range(0..300) as f64),
                engagement_rate: Some(rng.random_range(1.0..10.0)),
            }
        })
        .collect();

    PostTable::from_records(records, DataSource::Synthetic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn datetime_coercion_accepts_common_layouts() {
        assert!(parse_datetime("2023-05-01 14:30:00").is_some());
        assert!(parse_datetime("2023-05-01T14:30:00").is_some());
        assert_eq!(
            parse_datetime("2023-05-01"),
            NaiveDate::from_ymd_opt(2023, 5, 1).map(|d| d.and_time(NaiveTime::MIN))
        );
        assert_eq!(parse_datetime("not a date"), None);
        assert_eq!(parse_datetime(""), None);
    }

    #[test]
    fn numeric_coercion_nulls_bad_cells() {
        assert_eq!(parse_number("42.5"), Some(42.5));
        assert_eq!(parse_number(" 7 "), Some(7.0));
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn boolean_coercion_is_lenient() {
        assert!(parse_bool("True"));
        assert!(parse_bool("1"));
        assert!(parse_bool("yes"));
        assert!(!parse_bool("False"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("maybe"));
    }

    #[test]
    fn synthetic_table_has_the_documented_shape() {
        let table = synthetic(Some(42));
        assert_eq!(table.len(), 100);
        assert_eq!(table.source, DataSource::Synthetic);
        assert_eq!(
            table.platforms,
            vec!["Twitter", "Facebook", "Instagram", "LinkedIn"]
        );
        assert_eq!(table.post_types, vec!["image", "video", "text", "link"]);

        for (i, rec) in table.records.iter().enumerate() {
            assert_eq!(rec.post_id, i as i64 + 1);
            assert_eq!(rec.num_hashtags, (i % 6) as u32);
            assert_eq!(rec.is_paid_promotion, i % 2 == 0);
            assert_eq!(rec.day_of_week, CANONICAL_WEEK[i % 7]);
            let rate = rec.engagement_rate.unwrap();
            assert!((1.0..10.0).contains(&rate));
        }
        let (min, max) = table.date_span().unwrap();
        assert_eq!(min, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(max, NaiveDate::from_ymd_opt(2023, 4, 10).unwrap());
    }

    #[test]
    fn synthetic_table_is_reproducible_with_a_seed() {
        let a = synthetic(Some(7));
        let b = synthetic(Some(7));
        assert_eq!(a.records, b.records);
    }

    #[test]
    fn load_falls_back_on_missing_file() {
        let table = load(Path::new("/definitely/not/here.csv"));
        assert_eq!(table.source, DataSource::Synthetic);
        assert_eq!(table.len(), 100);
    }

    #[test]
    fn read_csv_coerces_cells_and_keeps_bad_values_as_null() {
        let path = std::env::temp_dir().join("pulseboard_loader_test.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "post_id,platform,post_type,is_paid_promotion,num_hashtags,post_datetime,\
             day_of_week,post_reach,likes,comments,shares,saves,content_length,\
             watch_time,engagement_rate"
        )
        .unwrap();
        writeln!(
            file,
            "1,Twitter,image,True,3,2023-02-01 08:00:00,Wednesday,1200,55,10,4,2,130,0,3.5"
        )
        .unwrap();
        writeln!(
            file,
            "2,Facebook,video,no,oops,garbage,Thursday,not-a-number,60,,5,1,200,45,4.1"
        )
        .unwrap();
        drop(file);

        let table = read_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(table.len(), 2);
        let first = &table.records[0];
        assert!(first.is_paid_promotion);
        assert_eq!(first.num_hashtags, 3);
        assert_eq!(first.post_reach, Some(1200.0));

        let second = &table.records[1];
        assert!(!second.is_paid_promotion);
        assert_eq!(second.num_hashtags, 0); // unparsable → 0
        assert_eq!(second.post_datetime, None); // unparsable → null
        assert_eq!(second.post_reach, None);
        assert_eq!(second.comments, None); // empty cell
        assert_eq!(second.likes, Some(60.0));
    }

    #[test]
    fn read_csv_reports_missing_file() {
        let err = read_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::SourceUnavailable { .. }));
    }
}
