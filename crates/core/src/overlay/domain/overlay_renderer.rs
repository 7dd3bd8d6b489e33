use crate::shared::detection_result::DetectionResult;
use crate::shared::frame::Frame;
use crate::shared::landmark::{Landmark, LandmarkKind, Point};

use super::render_surface::{Color, RenderSurface};

const FACE_OUTLINE_COLOR: Color = Color::rgb(107, 114, 128);
const MOUTH_COLOR: Color = Color::rgb(239, 68, 68);
const EYE_COLOR: Color = Color::rgb(59, 130, 246);
const NOSE_COLOR: Color = Color::rgb(16, 185, 129);
const CROP_COLOR: Color = Color::rgb(245, 158, 11);

const LANDMARK_RADIUS: f64 = 2.0;
const CROP_DASH: (f64, f64) = (5.0, 5.0);
const CROP_LABEL: &str = "Mouth Crop Region";
const LABEL_OFFSET_Y: f64 = 5.0;

fn color_for(kind: LandmarkKind) -> Color {
    match kind {
        LandmarkKind::FaceOutline => FACE_OUTLINE_COLOR,
        LandmarkKind::MouthOuter | LandmarkKind::MouthInner => MOUTH_COLOR,
        LandmarkKind::Eye => EYE_COLOR,
        LandmarkKind::Nose => NOSE_COLOR,
    }
}

/// Draws one frame plus its detection result onto a surface.
///
/// Stateless by design: everything shown is a function of the inputs, so
/// a stale or missing result simply renders less. Landmark dots take their
/// opacity from the landmark's confidence, making low-confidence points
/// visibly fainter.
#[derive(Default)]
pub struct OverlayRenderer;

impl OverlayRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        surface: &mut dyn RenderSurface,
        frame: &Frame,
        result: Option<&DetectionResult>,
    ) {
        surface.draw_frame(frame.data(), frame.width(), frame.height());
        let Some(result) = result else {
            return;
        };

        for landmark in &result.landmarks {
            self.draw_landmark(surface, landmark);
        }

        if let Some(crop) = result.crop() {
            surface.stroke_dashed_rect(crop, CROP_COLOR, CROP_DASH);
            surface.draw_label(
                CROP_LABEL,
                Point::new(crop.x, crop.y - LABEL_OFFSET_Y),
                CROP_COLOR,
            );
        }
    }

    fn draw_landmark(&self, surface: &mut dyn RenderSurface, landmark: &Landmark) {
        surface.fill_circle(
            landmark.position,
            LANDMARK_RADIUS,
            color_for(landmark.kind),
            landmark.confidence,
        );
    }
}
