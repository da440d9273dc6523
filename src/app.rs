use std::path::Path;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PulseboardApp {
    pub state: AppState,
}

impl PulseboardApp {
    /// Load the backing CSV once and build the initial state.
    pub fn new(path: &Path) -> Self {
        Self {
            state: AppState::from_path(path),
        }
    }
}

impl eframe::App for PulseboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::control_panel(ui, &mut self.state);
            });

        // ---- Central panel: dashboard sections ----
        egui::CentralPanel::default().show(ctx, |ui| {
            charts::dashboard(ui, &mut self.state);
        });
    }
}
