use eframe::egui::{Color32, RichText, ScrollArea, TextEdit, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::aggregate::{self, CategoryColumn, TimeSeriesParams};
use crate::data::filter;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central panel – the dashboard sections
// ---------------------------------------------------------------------------

/// Render every dashboard section. Each section reads the controls it needs
/// and calls exactly one pure transform; nothing here touches the snapshot.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            kpi_strip(ui, state);
            time_series_section(ui, state);
            platform_section(ui, state);
            post_type_section(ui, state);
            scatter_section(ui, state);
            hashtag_section(ui, state);
            day_of_week_section(ui, state);
            paid_vs_organic_section(ui, state);
            top_posts_section(ui, state);
            full_table_section(ui, state);
        });
}

// ---------------------------------------------------------------------------
// KPI strip
// ---------------------------------------------------------------------------

fn kpi_strip(ui: &mut Ui, state: &AppState) {
    let kpi = aggregate::kpi_summary(&state.table);
    ui.heading("Key Performance Indicators");
    ui.columns(4, |cols: &mut [Ui]| {
        metric_card(&mut cols[0], "Total Posts", fmt_thousands(kpi.total_posts as f64));
        metric_card(&mut cols[1], "Avg. Engagement Rate", fmt_rate(kpi.avg_engagement_rate));
        metric_card(&mut cols[2], "Total Reach", fmt_thousands(kpi.total_reach));
        metric_card(
            &mut cols[3],
            "Top Platform",
            kpi.top_platform.unwrap_or_else(|| "–".to_string()),
        );
    });
    ui.separator();
}

fn metric_card(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(label);
        ui.heading(RichText::new(value).strong());
    });
}

// ---------------------------------------------------------------------------
// Performance over time
// ---------------------------------------------------------------------------

fn time_series_section(ui: &mut Ui, state: &AppState) {
    ui.heading("Performance Over Time");

    let params = TimeSeriesParams {
        metric: state.controls.metric,
        start: state.controls.date_start,
        end: state.controls.date_end,
        window: state.controls.rolling_window,
    };
    let series = aggregate::time_series(&state.table, &params);

    let raw: PlotPoints = series
        .iter()
        .filter_map(|p| p.value.map(|v| [ts_x(p.timestamp), v]))
        .collect();
    let rolling: PlotPoints = series
        .iter()
        .filter_map(|p| p.rolling_average.map(|v| [ts_x(p.timestamp), v]))
        .collect();

    Plot::new("time_series")
        .legend(Legend::default())
        .height(260.0)
        .x_axis_formatter(date_formatter)
        .y_axis_label(params.metric.label())
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(raw)
                    .name("Actual")
                    .shape(MarkerShape::Circle)
                    .radius(2.5)
                    .color(Color32::LIGHT_BLUE),
            );
            plot_ui.line(
                Line::new(rolling)
                    .name(format!("{}-post rolling average", params.window))
                    .width(2.0)
                    .color(Color32::from_rgb(255, 107, 107)),
            );
        });
    ui.separator();
}

// ---------------------------------------------------------------------------
// Platform and post-type analysis
// ---------------------------------------------------------------------------

fn platform_section(ui: &mut Ui, state: &AppState) {
    ui.heading("Platform Performance");
    ui.columns(2, |cols: &mut [Ui]| {
        let counts = aggregate::category_distribution(
            &state.table,
            CategoryColumn::Platform,
            &state.controls.platforms,
        );
        let entries: Vec<(String, Option<f64>)> = counts
            .into_iter()
            .map(|c| (c.category, Some(c.count as f64)))
            .collect();
        cols[0].label("Posts by platform");
        category_bars(&mut cols[0], "platform_dist", &entries, "Posts");

        let means = aggregate::category_engagement(
            &state.table,
            CategoryColumn::Platform,
            &state.controls.platforms,
        );
        let entries: Vec<(String, Option<f64>)> = means
            .into_iter()
            .map(|m| (m.category, m.mean_engagement))
            .collect();
        cols[1].label("Engagement rate by platform");
        category_bars(&mut cols[1], "platform_engagement", &entries, "Engagement Rate (%)");
    });
    ui.separator();
}

fn post_type_section(ui: &mut Ui, state: &AppState) {
    ui.heading("Content Analysis");
    ui.columns(2, |cols: &mut [Ui]| {
        let counts = aggregate::category_distribution(
            &state.table,
            CategoryColumn::PostType,
            &state.controls.post_types,
        );
        let entries: Vec<(String, Option<f64>)> = counts
            .into_iter()
            .map(|c| (c.category, Some(c.count as f64)))
            .collect();
        cols[0].label("Posts by type");
        category_bars(&mut cols[0], "post_type_dist", &entries, "Posts");

        let means = aggregate::category_engagement(
            &state.table,
            CategoryColumn::PostType,
            &state.controls.post_types,
        );
        let entries: Vec<(String, Option<f64>)> = means
            .into_iter()
            .map(|m| (m.category, m.mean_engagement))
            .collect();
        cols[1].label("Engagement rate by type");
        category_bars(&mut cols[1], "post_type_engagement", &entries, "Engagement Rate (%)");
    });
    ui.separator();
}

// ---------------------------------------------------------------------------
// Engagement vs content length scatter
// ---------------------------------------------------------------------------

fn scatter_section(ui: &mut Ui, state: &AppState) {
    ui.heading("Engagement vs Content Length");

    let points = aggregate::scatter_points(&state.table, &state.controls.scatter_platforms);
    let colors = ColorMap::new(&state.table.platforms);
    let max_reach = points
        .iter()
        .filter_map(|p| p.post_reach)
        .fold(0.0_f64, f64::max);

    Plot::new("scatter")
        .legend(Legend::default())
        .height(260.0)
        .x_axis_label("Content Length")
        .y_axis_label("Engagement Rate (%)")
        .show(ui, |plot_ui| {
            // One marker per post so each can carry its own reach-scaled
            // radius; identical names collapse into one legend entry per
            // platform.
            for p in &points {
                let (Some(x), Some(y)) = (p.content_length, p.engagement_rate) else {
                    continue;
                };
                plot_ui.points(
                    Points::new(vec![[x, y]])
                        .name(&p.platform)
                        .shape(MarkerShape::Circle)
                        .radius(reach_radius(p.post_reach, max_reach))
                        .color(colors.color_for(&p.platform)),
                );
            }
        });
    ui.separator();
}

// ---------------------------------------------------------------------------
// Hashtag impact
// ---------------------------------------------------------------------------

fn hashtag_section(ui: &mut Ui, state: &AppState) {
    ui.heading("Hashtag Analysis");

    let impact = aggregate::hashtag_impact(&state.table, state.controls.max_hashtags);
    let line: PlotPoints = impact
        .iter()
        .filter_map(|g| g.mean_engagement.map(|v| [g.num_hashtags as f64, v]))
        .collect();

    Plot::new("hashtag_impact")
        .height(220.0)
        .x_axis_label("Number of Hashtags")
        .y_axis_label("Avg. Engagement Rate (%)")
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(line).width(2.0).color(Color32::LIGHT_GREEN));
        });
    ui.separator();
}

// ---------------------------------------------------------------------------
// Day-of-week performance
// ---------------------------------------------------------------------------

fn day_of_week_section(ui: &mut Ui, state: &AppState) {
    ui.heading("Day of Week Performance");

    let days = aggregate::day_of_week_performance(&state.table);
    let entries: Vec<(String, Option<f64>)> = days
        .into_iter()
        .map(|d| (d.day.to_string(), d.mean_engagement))
        .collect();
    category_bars(ui, "day_of_week", &entries, "Avg. Engagement Rate (%)");
    ui.separator();
}

// ---------------------------------------------------------------------------
// Paid vs organic comparison
// ---------------------------------------------------------------------------

fn paid_vs_organic_section(ui: &mut Ui, state: &AppState) {
    ui.heading("Paid vs Organic Performance");

    let groups = aggregate::paid_vs_organic(&state.table);
    let series: [(&str, fn(&aggregate::PromotionGroup) -> Option<f64>); 4] = [
        ("Likes", |g| g.likes),
        ("Comments", |g| g.comments),
        ("Shares", |g| g.shares),
        ("Engagement Rate", |g| g.engagement_rate),
    ];
    let colors = crate::color::generate_palette(series.len());
    let labels: Vec<String> = groups.iter().map(|g| g.label.to_string()).collect();

    Plot::new("paid_vs_organic")
        .legend(Legend::default())
        .height(240.0)
        .x_axis_formatter(index_formatter(labels))
        .show(ui, |plot_ui| {
            for (si, (name, read)) in series.iter().enumerate() {
                let bars: Vec<Bar> = groups
                    .iter()
                    .enumerate()
                    .filter_map(|(gi, g)| {
                        read(g).map(|v| {
                            Bar::new(gi as f64 + (si as f64 - 1.5) * 0.2, v)
                                .width(0.18)
                                .fill(colors[si])
                        })
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(*name).color(colors[si]));
            }
        });
    ui.separator();
}

// ---------------------------------------------------------------------------
// Top posts and full data table
// ---------------------------------------------------------------------------

const TOP_POST_COLUMNS: [&str; 8] = [
    "Post ID",
    "Platform",
    "Type",
    "Engagement Rate",
    "Reach",
    "Likes",
    "Comments",
    "Shares",
];

fn top_posts_section(ui: &mut Ui, state: &AppState) {
    ui.heading("Top Performing Posts");

    let top = aggregate::top_posts(&state.table, 10);
    ui.push_id("top_posts", |ui: &mut Ui| {
        egui_extras::TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(egui_extras::Column::auto().resizable(true), TOP_POST_COLUMNS.len())
            .header(18.0, |mut header| {
                for title in TOP_POST_COLUMNS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(16.0, top.len(), |mut row| {
                    let p = &top[row.index()];
                    let cells = [
                        p.post_id.to_string(),
                        p.platform.clone(),
                        p.post_type.clone(),
                        fmt_rate(p.engagement_rate),
                        fmt_count(p.post_reach),
                        fmt_count(p.likes),
                        fmt_count(p.comments),
                        fmt_count(p.shares),
                    ];
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
    ui.separator();
}

const FULL_TABLE_COLUMNS: [&str; 15] = [
    "Post ID",
    "Platform",
    "Type",
    "Paid",
    "Hashtags",
    "Posted",
    "Day",
    "Reach",
    "Likes",
    "Comments",
    "Shares",
    "Saves",
    "Length",
    "Watch Time",
    "Engagement Rate",
];

fn full_table_section(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Full Data Table");
    ui.add(
        TextEdit::singleline(&mut state.controls.search_term).hint_text("Search posts"),
    );

    let hits = filter::search_indices(&state.table, &state.controls.search_term);
    ui.label(format!("{} of {} posts", hits.len(), state.table.len()));

    ui.push_id("full_table", |ui: &mut Ui| {
        egui_extras::TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(egui_extras::Column::auto().resizable(true), FULL_TABLE_COLUMNS.len())
            .header(18.0, |mut header| {
                for title in FULL_TABLE_COLUMNS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(16.0, hits.len(), |mut row| {
                    let rec = &state.table.records[hits[row.index()]];
                    for cell in rec.cells() {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}

// ---------------------------------------------------------------------------
// Shared chart / formatting helpers
// ---------------------------------------------------------------------------

/// Bar chart over labelled categories. Entries with a missing value keep
/// their axis slot but draw no bar.
fn category_bars(ui: &mut Ui, id: &str, entries: &[(String, Option<f64>)], y_label: &str) {
    let labels: Vec<String> = entries.iter().map(|(l, _)| l.clone()).collect();
    let colors = ColorMap::new(&labels);

    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .filter_map(|(i, (label, value))| {
            value.map(|v| {
                Bar::new(i as f64, v)
                    .width(0.6)
                    .name(label)
                    .fill(colors.color_for(label))
            })
        })
        .collect();

    Plot::new(id.to_string())
        .height(220.0)
        .y_axis_label(y_label)
        .x_axis_formatter(index_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Axis formatter mapping integral marks to category labels.
fn index_formatter(
    labels: Vec<String>,
) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let rounded = mark.value.round();
        if (mark.value - rounded).abs() < 1e-3 && rounded >= 0.0 {
            labels.get(rounded as usize).cloned().unwrap_or_default()
        } else {
            String::new()
        }
    }
}

/// Scatter marker radius scaled by reach: sqrt keeps the marker *area*
/// proportional, between 1.5 and 5.5 points. Missing reach (or an all-empty
/// scatter) gets a fixed mid-size marker.
fn reach_radius(reach: Option<f64>, max_reach: f64) -> f32 {
    match reach {
        Some(r) if max_reach > 0.0 => 1.5 + 4.0 * (r / max_reach).sqrt() as f32,
        _ => 3.0,
    }
}

fn ts_x(ts: chrono::NaiveDateTime) -> f64 {
    ts.and_utc().timestamp() as f64
}

fn date_formatter(mark: egui_plot::GridMark, _range: &std::ops::RangeInclusive<f64>) -> String {
    chrono::DateTime::from_timestamp(mark.value as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// `1234567.0` → `"1,234,567"`.
fn fmt_thousands(value: f64) -> String {
    let digits = format!("{}", value.round() as i64);
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits.as_str()),
    };
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("{sign}{out}")
}

fn fmt_rate(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}%")).unwrap_or_else(|| "–".to_string())
}

fn fmt_count(value: Option<f64>) -> String {
    value.map(fmt_thousands).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{fmt_thousands, reach_radius};

    #[test]
    fn scatter_radius_grows_with_reach() {
        let small = reach_radius(Some(1_000.0), 10_000.0);
        let large = reach_radius(Some(10_000.0), 10_000.0);
        assert!(small < large);
        assert!((large - 5.5).abs() < 1e-6); // full-reach marker hits the cap
        assert!(small >= 1.5);
    }

    #[test]
    fn scatter_radius_defaults_when_reach_is_missing() {
        assert_eq!(reach_radius(None, 10_000.0), 3.0);
        assert_eq!(reach_radius(Some(500.0), 0.0), 3.0);
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(fmt_thousands(0.0), "0");
        assert_eq!(fmt_thousands(999.0), "999");
        assert_eq!(fmt_thousands(1000.0), "1,000");
        assert_eq!(fmt_thousands(1234567.0), "1,234,567");
        assert_eq!(fmt_thousands(-4200.0), "-4,200");
    }
}
