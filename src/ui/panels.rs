use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};
use egui_extras::DatePickerButton;

use crate::data::model::Metric;
use crate::state::{AppState, MAX_ROLLING_WINDOW, MIN_ROLLING_WINDOW};

// ---------------------------------------------------------------------------
// Left side panel – dashboard controls
// ---------------------------------------------------------------------------

/// Render the control panel. Widgets write straight into `state.controls`;
/// the chart sections recompute from those values on the same frame.
pub fn control_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Time-series controls ----
            ui.strong("Performance over time");
            egui::ComboBox::from_id_salt("metric_select")
                .selected_text(state.controls.metric.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for metric in Metric::ALL {
                        if ui
                            .selectable_label(state.controls.metric == metric, metric.label())
                            .clicked()
                        {
                            state.controls.metric = metric;
                        }
                    }
                });

            ui.horizontal(|ui: &mut Ui| {
                ui.label("From");
                ui.add(DatePickerButton::new(&mut state.controls.date_start).id_salt("date_start"));
            });
            ui.horizontal(|ui: &mut Ui| {
                ui.label("To");
                ui.add(DatePickerButton::new(&mut state.controls.date_end).id_salt("date_end"));
            });
            if state.controls.date_end < state.controls.date_start {
                state.controls.date_end = state.controls.date_start;
            }

            ui.add(
                Slider::new(
                    &mut state.controls.rolling_window,
                    MIN_ROLLING_WINDOW..=MAX_ROLLING_WINDOW,
                )
                .text("Rolling window"),
            );
            state.clamp_rolling_window();
            ui.separator();

            // ---- Category multi-selects ----
            let platforms = state.table.platforms.clone();
            let post_types = state.table.post_types.clone();

            category_checklist(ui, "Platforms", &platforms, &mut state.controls.platforms);
            ui.separator();
            category_checklist(ui, "Post types", &post_types, &mut state.controls.post_types);
            ui.separator();
            category_checklist(
                ui,
                "Scatter platforms",
                &platforms,
                &mut state.controls.scatter_platforms,
            );
            ui.separator();

            // ---- Hashtag threshold ----
            ui.strong("Hashtag analysis");
            let top = state.table.max_hashtags().max(1);
            ui.add(Slider::new(&mut state.controls.max_hashtags, 1..=top).text("Max hashtags"));
        });
}

/// A collapsible group of checkboxes over a category's distinct values, with
/// All / None shortcuts (empty selection is valid and yields empty charts).
fn category_checklist(
    ui: &mut Ui,
    title: &str,
    all_values: &[String],
    selected: &mut BTreeSet<String>,
) {
    let header = format!("{title}  ({}/{})", selected.len(), all_values.len());
    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    selected.extend(all_values.iter().cloned());
                }
                if ui.small_button("None").clicked() {
                    selected.clear();
                }
            });

            for value in all_values {
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, value).changed() {
                    AppState::toggle_selection(selected, value);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(format!(
            "{} posts from {}",
            state.table.len(),
            state.source_path.display()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open post metrics")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::read_csv(&path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} posts, platforms {:?}",
                    table.len(),
                    table.platforms
                );
                state.set_table(table, path);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
