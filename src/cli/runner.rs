use std::fs;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::config::{ViewerConfig, load_config};
use crate::formats::{decode_rgba, extract_pixel_matrix, save_png};
use crate::model::{Mask, ViewerState};
use crate::render::RenderPipeline;
use crate::runtime::AppContext;
use crate::segmentation::Seed;

use super::types::{Cli, Commands, MatrixSummary, SequenceInfo, SliceInfo, SliceInput};

/// Slack on top of the HTTP timeout before giving up on a worker.
const WAIT_MARGIN: Duration = Duration::from_secs(5);

/// `--verbose` forces debug; otherwise `RUST_LOG` applies, falling back to warn.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn run_cli() -> Result<(), String> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = resolve_config(cli.config.as_deref(), cli.backend.as_deref())?;

    match cli.command {
        Commands::Info { input } => {
            let viewer = load_viewer(&input, 0)?;
            let entries = viewer
                .sequence()
                .iter()
                .map(|slice| {
                    let decoded = decode_rgba(&slice.image);
                    SliceInfo {
                        index: slice.index,
                        bytes: slice.image.len(),
                        width: decoded.as_ref().ok().map(|image| image.width()),
                        height: decoded.as_ref().ok().map(|image| image.height()),
                        error: decoded.err().map(|error| error.to_string()),
                    }
                })
                .collect();
            let info = SequenceInfo {
                slices: viewer.len(),
                entries,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&info).map_err(|error| error.to_string())?
            );
        }
        Commands::Matrix {
            input,
            slice,
            output,
        } => {
            let viewer = load_viewer(&input, slice)?;
            let image = viewer
                .active_slice()
                .map(|slice| slice.image.clone())
                .ok_or_else(|| "no active slice".to_string())?;
            let matrix = extract_pixel_matrix(&image).map_err(|error| error.to_string())?;
            if let Some(path) = &output {
                write_json(path, &matrix.to_rows())?;
            }
            let (min, max) = matrix.min_max().unzip();
            let summary = MatrixSummary {
                slice,
                width: matrix.width(),
                height: matrix.height(),
                min,
                max,
                mean: matrix.mean(),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).map_err(|error| error.to_string())?
            );
        }
        Commands::Render {
            input,
            slice,
            point,
            mask,
            output,
        } => {
            let mut viewer = load_viewer(&input, slice)?;
            if let Some(point) = point {
                viewer
                    .set_active_point(point)
                    .map_err(|error| error.to_string())?;
            }
            if let Some(path) = &mask {
                let raw = fs::read_to_string(path).map_err(|error| error.to_string())?;
                let rows: Vec<Vec<bool>> =
                    serde_json::from_str(&raw).map_err(|error| error.to_string())?;
                let mask = Mask::from_rows(rows).map_err(|error| error.to_string())?;
                viewer
                    .set_mask(slice, mask)
                    .map_err(|error| error.to_string())?;
            }
            render_to_png(&viewer, &output)?;
            println!("{}", json!({"status": "ok", "slice": slice, "output": output}));
        }
        Commands::Segment {
            input,
            slice,
            point,
            roi,
            default_roi,
            output,
            mask_output,
        } => {
            let context = AppContext::new(config).map_err(|error| error.to_string())?;
            let mut viewer = load_viewer(&input, slice)?;
            if let Some(point) = point {
                viewer
                    .set_active_point(point)
                    .map_err(|error| error.to_string())?;
            }
            let seed = match (roi, default_roi) {
                (Some(roi), _) => Seed::Roi(roi),
                (None, true) => {
                    Seed::Roi(context.default_roi().map_err(|error| error.to_string())?)
                }
                (None, false) => Seed::Point(viewer.active_point()),
            };

            let mut workflow = context.workflow();
            let ticket = workflow
                .submit(&viewer, seed)
                .map_err(|error| error.to_string())?;
            let timeout =
                Duration::from_secs(context.config().backend.timeout_secs) + WAIT_MARGIN;
            let outcome = workflow
                .wait(&mut viewer, timeout)
                .ok_or_else(|| format!("segmentation job {} timed out", ticket.job_id))?;
            let flagged = outcome.result.map_err(|error| error.to_string())?;

            if let Some(path) = &mask_output {
                let mask = viewer
                    .store()
                    .mask(slice)
                    .ok_or_else(|| "mask missing after segmentation".to_string())?;
                write_json(path, &mask.to_rows())?;
            }
            if let Some(path) = &output {
                render_to_png(&viewer, path)?;
            }
            println!(
                "{}",
                json!({
                    "status": "ok",
                    "slice": outcome.index,
                    "seed": format!("{:?}", outcome.kind),
                    "flagged": flagged,
                })
            );
        }
        Commands::View { input } => {
            let context = AppContext::new(config).map_err(|error| error.to_string())?;
            crate::ui::run(input.source(), context)?;
        }
    }

    Ok(())
}

fn resolve_config(path: Option<&Path>, backend: Option<&str>) -> Result<ViewerConfig, String> {
    let mut config = match path {
        Some(path) => load_config(path).map_err(|error| error.to_string())?,
        None => ViewerConfig::default(),
    };
    if let Some(url) = backend {
        config.backend.base_url = url.trim_end_matches('/').to_string();
    }
    config.validate().map_err(|error| error.to_string())?;
    Ok(config)
}

fn load_viewer(input: &SliceInput, slice: usize) -> Result<ViewerState, String> {
    let source = input
        .source()
        .ok_or_else(|| "no slices given: pass image files or --upload-response".to_string())?;
    let sequence = source.load().map_err(|error| error.to_string())?;
    let mut viewer = ViewerState::new(sequence);
    if !viewer.navigation_mut().select(slice) {
        return Err(format!(
            "slice {slice} is out of range for {} slices",
            viewer.len()
        ));
    }
    Ok(viewer)
}

fn render_to_png(viewer: &ViewerState, output: &Path) -> Result<(), String> {
    let mut pipeline = RenderPipeline::new();
    pipeline
        .ensure_rendered(viewer)
        .map_err(|error| error.to_string())?;
    save_png(pipeline.canvas().pixels(), output).map_err(|error| error.to_string())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|error| error.to_string())?;
    fs::write(path, raw).map_err(|error| error.to_string())
}
