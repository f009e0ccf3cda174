use crate::model::{ImagePoint, MATRIX_SIZE, Roi};

/// In-progress and committed ROI drag on the canvas. Corners are in matrix space
/// (see [`super::transform::pixel_to_matrix`]), the space ROI seeds are sent in.
#[derive(Debug, Clone, Default)]
pub struct RoiSelection {
    active: Option<(ImagePoint, ImagePoint)>,
    committed: Option<Roi>,
}

impl RoiSelection {
    pub fn begin_active(&mut self, start: ImagePoint) {
        self.active = Some((start, start));
    }

    pub fn update_active(&mut self, end: ImagePoint) {
        if let Some((_, current)) = &mut self.active {
            *current = end;
        }
    }

    /// Turns the drag into a committed region clipped to the matrix. Degenerate drags
    /// (zero width or height after clipping) keep the previous region.
    pub fn commit_active(&mut self) -> Option<Roi> {
        let (start, end) = self.active.take()?;
        let roi = Roi::from_corners(clip_to_matrix(start), clip_to_matrix(end)).ok()?;
        self.committed = Some(roi);
        Some(roi)
    }

    pub fn abort_active(&mut self) {
        self.active = None;
    }

    pub fn clear_all(&mut self) {
        self.active = None;
        self.committed = None;
    }

    pub fn active_corners(&self) -> Option<(ImagePoint, ImagePoint)> {
        self.active
    }

    pub fn committed(&self) -> Option<Roi> {
        self.committed
    }

    pub fn status_text(&self) -> Option<String> {
        if let Some((start, end)) = self.active {
            let w = (end.x - start.x).abs();
            let h = (end.y - start.y).abs();
            return Some(format!("ROI {:.0}x{:.0}", w, h));
        }
        self.committed.map(|roi| {
            format!(
                "ROI [{}, {}, {}, {}]",
                roi.x0, roi.y0, roi.x1, roi.y1
            )
        })
    }
}

fn clip_to_matrix(point: ImagePoint) -> ImagePoint {
    let limit = MATRIX_SIZE as f32;
    ImagePoint::new(point.x.clamp(0.0, limit), point.y.clamp(0.0, limit))
}

#[cfg(test)]
mod tests {
    use eframe::egui;

    use super::RoiSelection;
    use crate::model::ImagePoint;
    use crate::ui::interaction::transform::{pixel_to_matrix, pointer_to_pixel};

    #[test]
    fn drag_commits_ordered_region() {
        let mut selection = RoiSelection::default();
        selection.begin_active(ImagePoint::new(120.0, 80.0));
        selection.update_active(ImagePoint::new(40.5, 200.2));
        assert_eq!(selection.status_text().as_deref(), Some("ROI 80x120"));
        let roi = selection.commit_active().expect("roi");
        assert_eq!(roi.as_array(), [40, 80, 120, 200]);
        assert_eq!(selection.committed(), Some(roi));
        assert!(selection.active_corners().is_none());
    }

    #[test]
    fn degenerate_drag_keeps_previous_region() {
        let mut selection = RoiSelection::default();
        selection.begin_active(ImagePoint::new(0.0, 0.0));
        selection.update_active(ImagePoint::new(10.0, 10.0));
        let first = selection.commit_active().expect("first");

        selection.begin_active(ImagePoint::new(5.0, 5.0));
        assert!(selection.commit_active().is_none());
        assert_eq!(selection.committed(), Some(first));

        selection.clear_all();
        assert!(selection.committed().is_none());
    }

    #[test]
    fn drag_on_large_bitmap_commits_matrix_space_region() {
        let display = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(512.0, 512.0));
        let to_matrix = |x: f32, y: f32| {
            pixel_to_matrix(1024, 1024, pointer_to_pixel(display, 1024, 1024, egui::pos2(x, y)))
        };
        let mut selection = RoiSelection::default();
        selection.begin_active(to_matrix(256.0, 256.0));
        selection.update_active(to_matrix(512.0, 512.0));
        let roi = selection.commit_active().expect("roi");
        assert_eq!(roi.as_array(), [256, 256, 512, 512]);
    }

    #[test]
    fn drag_on_wide_bitmap_scales_each_axis() {
        let display = egui::Rect::from_min_size(egui::pos2(10.0, 10.0), egui::vec2(400.0, 400.0));
        let to_matrix = |x: f32, y: f32| {
            pixel_to_matrix(800, 200, pointer_to_pixel(display, 800, 200, egui::pos2(x, y)))
        };
        let mut selection = RoiSelection::default();
        selection.begin_active(to_matrix(110.0, 60.0));
        selection.update_active(to_matrix(310.0, 260.0));
        let roi = selection.commit_active().expect("roi");
        assert_eq!(roi.as_array(), [128, 64, 384, 320]);
    }

    #[test]
    fn drag_past_canvas_edge_is_clipped_to_matrix() {
        let mut selection = RoiSelection::default();
        selection.begin_active(ImagePoint::new(-40.0, 400.0));
        selection.update_active(ImagePoint::new(700.0, 600.0));
        let roi = selection.commit_active().expect("roi");
        assert_eq!(roi.as_array(), [0, 400, 512, 512]);
    }
}
