use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::model::{ImagePoint, Roi};
use crate::runtime::SliceSource;

#[derive(Debug, Parser)]
#[command(
    name = "slice-annotator",
    version,
    about = "Point and ROI segmentation viewer for image slice sequences"
)]
pub(super) struct Cli {
    /// Log at debug level.
    #[arg(long, global = true)]
    pub(super) verbose: bool,
    /// YAML (.yaml/.yml) or JSON viewer config.
    #[arg(long, global = true)]
    pub(super) config: Option<PathBuf>,
    /// Overrides `backend.base_url` from the config.
    #[arg(long, global = true)]
    pub(super) backend: Option<String>,
    #[command(subcommand)]
    pub(super) command: Commands,
}

#[derive(Debug, Subcommand)]
pub(super) enum Commands {
    /// Prints slice count and per-slice sizes as JSON.
    Info {
        #[command(flatten)]
        input: SliceInput,
    },
    /// Extracts the 512x512 luminance matrix sent to the backend.
    Matrix {
        #[command(flatten)]
        input: SliceInput,
        #[arg(long, default_value_t = 0)]
        slice: usize,
        /// Writes the matrix rows as JSON.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Composites a slice with its point marker and mask overlay into a PNG.
    Render {
        #[command(flatten)]
        input: SliceInput,
        #[arg(long, default_value_t = 0)]
        slice: usize,
        /// Point as `x,y` in image pixels.
        #[arg(long, value_parser = parse_point)]
        point: Option<ImagePoint>,
        /// JSON file holding a 512x512 boolean mask.
        #[arg(long)]
        mask: Option<PathBuf>,
        #[arg(long)]
        output: PathBuf,
    },
    /// Sends one slice to the segmentation backend and waits for the mask.
    Segment {
        #[command(flatten)]
        input: SliceInput,
        #[arg(long, default_value_t = 0)]
        slice: usize,
        /// Point seed as `x,y`; an empty point list is sent when no seed is given.
        #[arg(long, value_parser = parse_point)]
        point: Option<ImagePoint>,
        /// ROI seed as `x0,y0,x1,y1` in 512x512 matrix pixels; selects the ROI endpoint.
        #[arg(long, value_parser = parse_roi, conflicts_with = "point")]
        roi: Option<Roi>,
        /// Use the configured default ROI.
        #[arg(long, conflicts_with_all = ["point", "roi"])]
        default_roi: bool,
        /// Composited PNG of the slice with the returned mask.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Returned mask rows as JSON.
        #[arg(long)]
        mask_output: Option<PathBuf>,
    },
    /// Opens the desktop viewer, optionally with slices preloaded.
    View {
        #[command(flatten)]
        input: SliceInput,
    },
}

#[derive(Debug, Clone, Args)]
pub(super) struct SliceInput {
    /// Encoded slice images, in display order.
    pub(super) images: Vec<PathBuf>,
    /// Saved upload-service response (`{"dicom_images": [...]}`).
    #[arg(long, conflicts_with = "images")]
    pub(super) upload_response: Option<PathBuf>,
}

impl SliceInput {
    pub(super) fn source(&self) -> Option<SliceSource> {
        if let Some(path) = &self.upload_response {
            return Some(SliceSource::UploadResponse(path.clone()));
        }
        (!self.images.is_empty()).then(|| SliceSource::Files(self.images.clone()))
    }
}

#[derive(Debug, Serialize)]
pub(super) struct SequenceInfo {
    pub(super) slices: usize,
    pub(super) entries: Vec<SliceInfo>,
}

#[derive(Debug, Serialize)]
pub(super) struct SliceInfo {
    pub(super) index: usize,
    pub(super) bytes: usize,
    pub(super) width: Option<u32>,
    pub(super) height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct MatrixSummary {
    pub(super) slice: usize,
    pub(super) width: usize,
    pub(super) height: usize,
    pub(super) min: Option<u8>,
    pub(super) max: Option<u8>,
    pub(super) mean: Option<f64>,
}

pub(super) fn parse_point(raw: &str) -> Result<ImagePoint, String> {
    let values = parse_list::<f32>(raw, 2)?;
    if values.iter().any(|value| !value.is_finite()) {
        return Err(format!("point `{raw}` must be finite"));
    }
    Ok(ImagePoint::new(values[0], values[1]))
}

pub(super) fn parse_roi(raw: &str) -> Result<Roi, String> {
    let values = parse_list::<u32>(raw, 4)?;
    Roi::new(values[0], values[1], values[2], values[3]).map_err(|error| error.to_string())
}

fn parse_list<T: std::str::FromStr>(raw: &str, expected: usize) -> Result<Vec<T>, String> {
    let values = raw
        .split(',')
        .map(|part| part.trim().parse::<T>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| format!("`{raw}` is not a comma-separated list of numbers"))?;
    if values.len() != expected {
        return Err(format!(
            "`{raw}` has {} values, expected {expected}",
            values.len()
        ));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, parse_point, parse_roi};
    use crate::model::ImagePoint;
    use crate::runtime::SliceSource;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn point_and_roi_arguments_parse() {
        assert_eq!(parse_point("263, 145.5"), Ok(ImagePoint::new(263.0, 145.5)));
        assert!(parse_point("1").is_err());
        assert!(parse_point("a,b").is_err());
        assert_eq!(parse_roi("50,50,200,200").expect("roi").as_array(), [50, 50, 200, 200]);
        assert!(parse_roi("200,50,50,200").is_err());
        assert!(parse_roi("1,2,3").is_err());
    }

    #[test]
    fn slice_input_prefers_upload_response() {
        let cli = Cli::try_parse_from([
            "slice-annotator",
            "--backend",
            "http://10.0.0.2:3004",
            "segment",
            "a.png",
            "b.png",
            "--slice",
            "1",
            "--point",
            "10,20",
        ])
        .expect("parse");
        assert_eq!(cli.backend.as_deref(), Some("http://10.0.0.2:3004"));
        let Commands::Segment { input, slice, point, .. } = cli.command else {
            panic!("expected segment");
        };
        assert_eq!(slice, 1);
        assert_eq!(point, Some(ImagePoint::new(10.0, 20.0)));
        assert_eq!(
            input.source(),
            Some(SliceSource::Files(vec![
                PathBuf::from("a.png"),
                PathBuf::from("b.png")
            ]))
        );

        let cli = Cli::try_parse_from(["slice-annotator", "info", "--upload-response", "up.json"])
            .expect("parse");
        let Commands::Info { input } = cli.command else {
            panic!("expected info");
        };
        assert_eq!(
            input.source(),
            Some(SliceSource::UploadResponse(PathBuf::from("up.json")))
        );
    }

    #[test]
    fn point_and_roi_seeds_conflict() {
        let result = Cli::try_parse_from([
            "slice-annotator",
            "segment",
            "a.png",
            "--point",
            "1,2",
            "--roi",
            "0,0,5,5",
        ]);
        assert!(result.is_err());
    }
}
