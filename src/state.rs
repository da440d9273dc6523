use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::data::loader;
use crate::data::model::{DataSource, Metric, PostTable};

/// Hard bounds on the rolling-average window control.
pub const MIN_ROLLING_WINDOW: usize = 1;
pub const MAX_ROLLING_WINDOW: usize = 30;

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// User-adjustable filter parameters. Each widget edits one field; each chart
/// section reads the fields it needs and calls the matching pure transform.
#[derive(Debug, Clone)]
pub struct Controls {
    pub metric: Metric,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub rolling_window: usize,
    pub platforms: BTreeSet<String>,
    pub post_types: BTreeSet<String>,
    /// The scatter section has its own platform multi-select.
    pub scatter_platforms: BTreeSet<String>,
    pub max_hashtags: u32,
    pub search_term: String,
}

impl Controls {
    /// Defaults: everything selected, full date span, 7-observation window.
    fn for_table(table: &PostTable) -> Self {
        let today = chrono::Local::now().date_naive();
        let (date_start, date_end) = table.date_span().unwrap_or((today, today));
        let platforms: BTreeSet<String> = table.platforms.iter().cloned().collect();

        Controls {
            metric: Metric::PostReach,
            date_start,
            date_end,
            rolling_window: 7,
            platforms: platforms.clone(),
            post_types: table.post_types.iter().cloned().collect(),
            scatter_platforms: platforms,
            max_hashtags: table.max_hashtags().max(1),
            search_term: String::new(),
        }
    }
}

/// The full dashboard state, independent of rendering: one immutable data
/// snapshot plus the current control values. There is no hidden rerun; the
/// UI reads `table` through the pure transforms every frame.
pub struct AppState {
    /// Loaded snapshot (real file or synthetic fallback; never absent).
    pub table: PostTable,

    /// Path the snapshot was loaded from (the load-once cache key).
    pub source_path: PathBuf,

    pub controls: Controls,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load the backing file once at startup; a failed load is replaced by
    /// the synthetic table with a visible advisory.
    pub fn from_path(path: &Path) -> Self {
        let table = loader::load(path);
        let status_message = match table.source {
            DataSource::Synthetic => Some(format!(
                "Could not read {} – showing synthetic sample data",
                path.display()
            )),
            DataSource::File(_) => None,
        };
        let controls = Controls::for_table(&table);

        AppState {
            table,
            source_path: path.to_path_buf(),
            controls,
            status_message,
        }
    }

    /// Replace the snapshot after an explicit File → Open, resetting every
    /// control to the new table's defaults.
    pub fn set_table(&mut self, table: PostTable, path: PathBuf) {
        self.controls = Controls::for_table(&table);
        self.table = table;
        self.source_path = path;
        self.status_message = None;
    }

    /// Toggle one value in a category multi-select.
    pub fn toggle_selection(selection: &mut BTreeSet<String>, value: &str) {
        if !selection.remove(value) {
            selection.insert(value.to_string());
        }
    }

    /// Clamp the rolling window to its documented 1–30 range.
    pub fn clamp_rolling_window(&mut self) {
        self.controls.rolling_window = self
            .controls
            .rolling_window
            .clamp(MIN_ROLLING_WINDOW, MAX_ROLLING_WINDOW);
    }
}
