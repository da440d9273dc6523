use std::path::PathBuf;

use eframe::egui;

use pulseboard::app::PulseboardApp;

const DEFAULT_DATA_PATH: &str = "social_media_post_performance.csv";

fn main() -> eframe::Result {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Pulseboard – Social Media Analytics",
        options,
        Box::new(move |_cc| Ok(Box::new(PulseboardApp::new(&path)))),
    )
}
