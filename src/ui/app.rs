use std::path::PathBuf;
use std::time::Duration;

use eframe::egui;
use rfd::FileDialog;
use tracing::{info, warn};

use crate::model::{ImagePoint, Roi, SliceSequence, ViewerState};
use crate::render::RenderPipeline;
use crate::runtime::{AppContext, SliceSource};
use crate::segmentation::{SegmentationWorkflow, SubmissionOutcome};

use super::interaction::roi::RoiSelection;
use super::interaction::transform::{
    matrix_to_pixel, pixel_to_matrix, pixel_to_pointer, pointer_to_pixel, square_display,
};
use super::interaction::wheel::frame_deltas;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp"];
const PENDING_REPAINT: Duration = Duration::from_millis(50);

pub(super) struct SliceViewerApp {
    context: AppContext,
    viewer: ViewerState,
    pipeline: RenderPipeline,
    workflow: SegmentationWorkflow,
    roi: RoiSelection,
    texture: Option<egui::TextureHandle>,
    status: String,
    error: Option<String>,
    render_error: Option<String>,
}

impl SliceViewerApp {
    pub(super) fn new(context: AppContext, source: Option<SliceSource>) -> Self {
        let workflow = context.workflow();
        let mut app = Self {
            context,
            viewer: ViewerState::default(),
            pipeline: RenderPipeline::new(),
            workflow,
            roi: RoiSelection::default(),
            texture: None,
            status: "Open images to begin.".to_string(),
            error: None,
            render_error: None,
        };
        if let Some(source) = source {
            app.open_source(&source);
        }
        app
    }

    fn open_source(&mut self, source: &SliceSource) {
        match source.load() {
            Ok(sequence) => self.load_sequence(sequence),
            Err(error) => {
                warn!(%error, "failed to open slices");
                self.error = Some(format!("Failed to open slices: {error}"));
            }
        }
    }

    fn load_sequence(&mut self, sequence: SliceSequence) {
        let len = sequence.len();
        self.viewer.load(sequence);
        self.workflow.clear();
        self.roi.clear_all();
        self.pipeline.invalidate();
        self.texture = None;
        self.error = None;
        self.render_error = None;
        self.status = format!("Loaded {len} images.");
    }

    fn pick_image_files(&mut self) {
        let paths: Vec<PathBuf> = FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .set_title("Open Slices")
            .pick_files()
            .unwrap_or_default();
        if paths.is_empty() {
            self.status = "Open canceled.".to_string();
            return;
        }
        self.open_source(&SliceSource::Files(paths));
    }

    fn pick_upload_response(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("Upload response", &["json"])
            .set_title("Open Upload Response")
            .pick_file()
        else {
            self.status = "Open canceled.".to_string();
            return;
        };
        self.open_source(&SliceSource::UploadResponse(path));
    }

    fn submit_point(&mut self) {
        match self.workflow.submit_point(&self.viewer) {
            Ok(ticket) => {
                self.error = None;
                self.status = format!("Segmenting image {} from point...", ticket.index + 1);
            }
            Err(error) => self.error = Some(error.to_string()),
        }
    }

    fn submit_roi(&mut self) {
        let roi = match self.roi.committed() {
            Some(roi) => roi,
            None => match self.context.default_roi() {
                Ok(roi) => roi,
                Err(error) => {
                    self.error = Some(error.to_string());
                    return;
                }
            },
        };
        match self.workflow.submit_roi(&self.viewer, roi) {
            Ok(ticket) => {
                self.error = None;
                self.status = format!("Segmenting image {} from ROI...", ticket.index + 1);
            }
            Err(error) => self.error = Some(error.to_string()),
        }
    }

    fn poll_workflow(&mut self) {
        for outcome in self.workflow.poll(&mut self.viewer) {
            self.report_outcome(outcome);
        }
    }

    fn report_outcome(&mut self, outcome: SubmissionOutcome) {
        let image = outcome.index + 1;
        match outcome.result {
            Ok(flagged) => {
                self.error = None;
                self.status = format!("Mask received for image {image} ({flagged} pixels).");
            }
            Err(error) => {
                self.error = Some(format!("Segmentation failed for image {image}: {error}"));
            }
        }
    }

    /// Recomposites the canvas if needed and mirrors it into the GPU texture.
    fn refresh_texture(&mut self, ctx: &egui::Context) {
        match self.pipeline.ensure_rendered(&self.viewer) {
            Ok(true) => {
                self.render_error = None;
                self.upload_frame(ctx);
            }
            Ok(false) => {
                if self.pipeline.canvas().width() == 0 {
                    self.texture = None;
                }
            }
            Err(error) => {
                self.texture = None;
                self.render_error = Some(format!("Failed to draw image: {error}"));
            }
        }
    }

    fn upload_frame(&mut self, ctx: &egui::Context) {
        let canvas = self.pipeline.canvas();
        let size = [canvas.width() as usize, canvas.height() as usize];
        let color = egui::ColorImage::from_rgba_unmultiplied(size, canvas.pixels().as_raw());
        if let Some(texture) = &mut self.texture {
            texture.set(color, egui::TextureOptions::LINEAR);
        } else {
            self.texture =
                Some(ctx.load_texture("slice-canvas", color, egui::TextureOptions::LINEAR));
        }
    }

    fn draw_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open Images...").clicked() {
                    self.pick_image_files();
                }
                if ui.button("Open Upload Response...").clicked() {
                    self.pick_upload_response();
                }
                ui.separator();

                let navigation = self.viewer.navigation();
                let can_back = navigation.can_step_backward();
                let can_forward = navigation.can_step_forward();
                if ui.add_enabled(can_back, egui::Button::new("Previous")).clicked() {
                    self.viewer.navigation_mut().step_backward();
                }
                ui.label(position_label(self.viewer.active_index(), self.viewer.len()));
                if ui
                    .add_enabled(can_forward, egui::Button::new("Next"))
                    .clicked()
                {
                    self.viewer.navigation_mut().step_forward();
                }
            });

            ui.horizontal(|ui| {
                let can_submit = self.workflow.can_submit(&self.viewer);
                let submitting = self
                    .viewer
                    .active_index()
                    .is_some_and(|index| self.workflow.is_submitting(index));

                let point_label = submit_label(submitting, "Submit Point");
                if ui
                    .add_enabled(can_submit, egui::Button::new(point_label))
                    .clicked()
                {
                    self.submit_point();
                }
                let roi_label = submit_label(submitting, "Submit ROI");
                if ui
                    .add_enabled(can_submit, egui::Button::new(roi_label))
                    .clicked()
                {
                    self.submit_roi();
                }
                if ui
                    .add_enabled(self.roi.committed().is_some(), egui::Button::new("Clear ROI"))
                    .clicked()
                {
                    self.roi.clear_all();
                }
                ui.separator();
                let roi_text = self.roi.status_text().unwrap_or_else(|| {
                    format!("ROI default {:?}", self.context.config().default_roi)
                });
                ui.label(roi_text);
            });
        });
    }

    fn draw_status(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            if let Some(error) = self.error.as_deref().or(self.render_error.as_deref()) {
                ui.colored_label(egui::Color32::from_rgb(220, 60, 60), error);
            } else {
                ui.label(&self.status);
            }
        });
    }

    fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let display = square_display(ui.available_rect_before_wrap());
        let response = ui.allocate_rect(display, egui::Sense::click_and_drag());

        self.handle_canvas_input(ui, &response, display);
        self.refresh_texture(ui.ctx());

        let painter = ui.painter_at(display);
        painter.rect_filled(display, 0.0, egui::Color32::from_gray(16));
        if let Some(texture) = &self.texture {
            painter.image(
                texture.id(),
                display,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        self.draw_roi(&painter, display);
    }

    fn handle_canvas_input(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        display: egui::Rect,
    ) {
        if response.hovered() {
            let deltas = ui.input(|input| frame_deltas(&input.events));
            for delta in deltas {
                if let Some(step) = self.viewer.navigation_mut().scroll(delta) {
                    info!(?step, "wheel navigation");
                }
            }
        }

        let canvas = self.pipeline.canvas();
        let (width, height) = (canvas.width() as usize, canvas.height() as usize);
        if width == 0 || height == 0 {
            return;
        }
        let to_pixel = |pointer: egui::Pos2| pointer_to_pixel(display, width, height, pointer);
        let to_matrix = |pointer: egui::Pos2| pixel_to_matrix(width, height, to_pixel(pointer));

        if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                if let Err(error) = self.viewer.set_active_point(to_pixel(pointer)) {
                    self.error = Some(error.to_string());
                }
            }
        }
        if response.drag_started() {
            if let Some(pointer) = response.interact_pointer_pos() {
                self.roi.begin_active(to_matrix(pointer));
            }
        }
        if response.dragged() {
            if let Some(pointer) = response.interact_pointer_pos() {
                self.roi.update_active(to_matrix(pointer));
            }
        }
        if response.drag_stopped() {
            if let Some(roi) = self.roi.commit_active() {
                self.status = format!("ROI set to {:?}.", roi.as_array());
            }
        }
    }

    fn draw_roi(&self, painter: &egui::Painter, display: egui::Rect) {
        let canvas = self.pipeline.canvas();
        let (width, height) = (canvas.width() as usize, canvas.height() as usize);
        if width == 0 || height == 0 {
            return;
        }
        let corners = self.roi.active_corners().or_else(|| {
            self.roi.committed().map(|roi: Roi| {
                (
                    ImagePoint::new(roi.x0 as f32, roi.y0 as f32),
                    ImagePoint::new(roi.x1 as f32, roi.y1 as f32),
                )
            })
        });
        if let Some((a, b)) = corners {
            let to_pointer = |corner: ImagePoint| {
                pixel_to_pointer(display, width, height, matrix_to_pixel(width, height, corner))
            };
            let rect = egui::Rect::from_two_pos(to_pointer(a), to_pointer(b));
            painter.rect_stroke(
                rect,
                0.0,
                egui::Stroke::new(1.5, egui::Color32::YELLOW),
                egui::StrokeKind::Inside,
            );
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let (back, forward) = ctx.input(|input| {
            (
                input.key_pressed(egui::Key::ArrowLeft),
                input.key_pressed(egui::Key::ArrowRight),
            )
        });
        if back {
            self.viewer.navigation_mut().step_backward();
        }
        if forward {
            self.viewer.navigation_mut().step_forward();
        }
        if ctx.input(|input| input.key_pressed(egui::Key::Escape)) {
            self.roi.abort_active();
        }
    }
}

impl eframe::App for SliceViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_workflow();
        self.handle_keys(ctx);
        self.draw_toolbar(ctx);
        self.draw_status(ctx);
        egui::CentralPanel::default().show(ctx, |ui| self.draw_canvas(ui));

        if self.workflow.has_pending() {
            ctx.request_repaint_after(PENDING_REPAINT);
        }
    }
}

fn position_label(active: Option<usize>, len: usize) -> String {
    match active {
        Some(index) => format!("Image {} of {len}", index + 1),
        None => "No images loaded".to_string(),
    }
}

fn submit_label(submitting: bool, idle: &'static str) -> &'static str {
    if submitting { "Processing..." } else { idle }
}
