use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const PLATFORMS: [&str; 4] = ["Twitter", "Facebook", "Instagram", "LinkedIn"];
const POST_TYPES: [&str; 4] = ["image", "video", "text", "link"];

fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Writes `social_media_post_performance.csv`: one year of randomized post
/// metrics in the schema the dashboard expects, seeded for reproducibility.
fn main() -> Result<()> {
    let output_path = "social_media_post_performance.csv";
    let rows = write_sample(Path::new(output_path), 365, 42)?;
    println!("Wrote {rows} posts to {output_path}");
    Ok(())
}

fn write_sample(path: &Path, rows: usize, seed: u64) -> Result<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut writer = csv::Writer::from_path(path).context("creating output CSV")?;

    writer
        .write_record([
            "post_id",
            "platform",
            "post_type",
            "is_paid_promotion",
            "num_hashtags",
            "post_datetime",
            "day_of_week",
            "post_reach",
            "likes",
            "comments",
            "shares",
            "saves",
            "content_length",
            "watch_time",
            "engagement_rate",
        ])
        .context("writing header")?;

    let start = NaiveDate::from_ymd_opt(2023, 1, 1).context("valid start date")?;

    for i in 0..rows {
        let date = start + Days::new(rng.random_range(0..365));
        let time = NaiveTime::from_hms_opt(
            rng.random_range(6..23),
            rng.random_range(0..60),
            rng.random_range(0..60),
        )
        .context("valid time of day")?;
        let ts = date.and_time(time);

        let post_type = POST_TYPES[rng.random_range(0..POST_TYPES.len())];
        let watch_time = if post_type == "video" {
            rng.random_range(10..300)
        } else {
            0
        };

        // Sprinkle a few empty metric cells so the loader's null coercion
        // shows up with generated data too.
        let saves = if rng.random_range(0..20) == 0 {
            String::new()
        } else {
            rng.random_range(0..40).to_string()
        };

        writer
            .write_record([
                (i + 1).to_string(),
                PLATFORMS[rng.random_range(0..PLATFORMS.len())].to_string(),
                post_type.to_string(),
                rng.random_range(0..4_u8).eq(&0).to_string(),
                rng.random_range(0..8_u32).to_string(),
                ts.format("%Y-%m-%d %H:%M:%S").to_string(),
                day_name(date.weekday()).to_string(),
                rng.random_range(500..20000).to_string(),
                rng.random_range(20..800).to_string(),
                rng.random_range(0..120).to_string(),
                rng.random_range(0..80).to_string(),
                saves,
                rng.random_range(30..800).to_string(),
                watch_time.to_string(),
                format!("{:.2}", rng.random_range(0.5..12.0)),
            ])
            .with_context(|| format!("writing row {i}"))?;
    }

    writer.flush().context("flushing CSV")?;
    Ok(rows)
}
