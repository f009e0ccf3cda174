pub mod cli;
pub mod config;
pub mod formats;
pub mod model;
pub mod render;
pub mod runtime;
pub mod segmentation;
pub mod ui;

pub fn run_cli() -> Result<(), String> {
    cli::run_cli()
}

/// Opens the desktop viewer with the default config and no slices loaded.
pub fn run_viewer() -> Result<(), String> {
    cli::init_tracing(false);
    let context = runtime::AppContext::new(config::ViewerConfig::default())
        .map_err(|error| error.to_string())?;
    ui::run(None, context)
}
