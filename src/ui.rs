mod app;
pub mod interaction;

use eframe::egui;

use crate::runtime::{AppContext, SliceSource};

use app::SliceViewerApp;

const WINDOW_SIZE: [f32; 2] = [720.0, 820.0];
const WINDOW_MIN_SIZE: [f32; 2] = [420.0, 480.0];

/// Opens the desktop viewer, optionally with an initial slice sequence.
pub fn run(source: Option<SliceSource>, context: AppContext) -> Result<(), String> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Slice Annotator")
            .with_inner_size(WINDOW_SIZE)
            .with_min_inner_size(WINDOW_MIN_SIZE)
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "Slice Annotator",
        options,
        Box::new(move |_cc| Ok(Box::new(SliceViewerApp::new(context, source)))),
    )
    .map_err(|error| error.to_string())
}
