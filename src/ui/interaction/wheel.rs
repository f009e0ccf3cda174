use eframe::egui;

/// Pixel delta a browser reports for one wheel notch. One notch reaches the navigation
/// threshold.
pub const LINE_DELTA: f32 = 100.0;

/// Converts one wheel event into a navigation delta. Wheel-down is positive (forward);
/// line and page units count as [`LINE_DELTA`] each, point units pass through.
pub fn navigation_delta(unit: egui::MouseWheelUnit, delta: egui::Vec2) -> f32 {
    let y = match unit {
        egui::MouseWheelUnit::Point => delta.y,
        egui::MouseWheelUnit::Line | egui::MouseWheelUnit::Page => delta.y * LINE_DELTA,
    };
    -y
}

/// Navigation deltas for every wheel event in this frame, in arrival order.
pub fn frame_deltas(events: &[egui::Event]) -> Vec<f32> {
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::MouseWheel { unit, delta, .. } => Some(navigation_delta(*unit, *delta)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use eframe::egui;

    use super::{frame_deltas, navigation_delta};
    use crate::model::{NavigationController, Step};

    #[test]
    fn one_line_notch_takes_one_step() {
        let mut navigation = NavigationController::new(3);
        let down = navigation_delta(egui::MouseWheelUnit::Line, egui::vec2(0.0, -1.0));
        assert_eq!(navigation.scroll(down), Some(Step::Forward));
        assert_eq!(navigation.active_index(), Some(1));

        let up = navigation_delta(egui::MouseWheelUnit::Line, egui::vec2(0.0, 1.0));
        assert_eq!(navigation.scroll(up), Some(Step::Backward));
        assert_eq!(navigation.active_index(), Some(0));
    }

    #[test]
    fn point_deltas_accumulate_unscaled() {
        let mut navigation = NavigationController::new(3);
        let delta = navigation_delta(egui::MouseWheelUnit::Point, egui::vec2(0.0, -40.0));
        assert_eq!(delta, 40.0);
        assert_eq!(navigation.scroll(delta), None);
        assert_eq!(navigation.scroll(delta), None);
        assert_eq!(navigation.scroll(delta), Some(Step::Forward));
    }

    #[test]
    fn only_wheel_events_are_collected() {
        let events = vec![
            egui::Event::PointerMoved(egui::pos2(1.0, 1.0)),
            egui::Event::MouseWheel {
                unit: egui::MouseWheelUnit::Line,
                delta: egui::vec2(0.0, -2.0),
                modifiers: egui::Modifiers::NONE,
            },
            egui::Event::MouseWheel {
                unit: egui::MouseWheelUnit::Point,
                delta: egui::vec2(0.0, 15.0),
                modifiers: egui::Modifiers::NONE,
            },
        ];
        assert_eq!(frame_deltas(&events), vec![200.0, -15.0]);
    }
}
