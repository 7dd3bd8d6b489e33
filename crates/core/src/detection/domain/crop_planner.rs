use crate::shared::constants::{CROP_PAD_X, CROP_PAD_Y};
use crate::shared::crop_region::CropRegion;
use crate::shared::landmark::Landmark;

/// Plans a padded, frame-clipped bounding box over the mouth landmarks.
///
/// Returns `None` when the set contains no mouth-kind points. Clamping is
/// per-edge, so a box touching a frame edge still yields a valid region
/// with non-negative dimensions.
pub struct CropPlanner {
    pad_x: f64,
    pad_y: f64,
}

impl CropPlanner {
    pub fn new(pad_x: f64, pad_y: f64) -> Self {
        Self { pad_x, pad_y }
    }

    pub fn plan(
        &self,
        landmarks: &[Landmark],
        frame_w: u32,
        frame_h: u32,
    ) -> Option<CropRegion> {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        let mut any = false;

        for lm in landmarks.iter().filter(|l| l.kind.is_mouth()) {
            min_x = min_x.min(lm.position.x);
            min_y = min_y.min(lm.position.y);
            max_x = max_x.max(lm.position.x);
            max_y = max_y.max(lm.position.y);
            any = true;
        }

        if !any {
            return None;
        }

        Some(CropRegion::clamped(
            min_x - self.pad_x,
            min_y - self.pad_y,
            max_x + self.pad_x,
            max_y + self.pad_y,
            frame_w as f64,
            frame_h as f64,
        ))
    }
}

impl Default for CropPlanner {
    fn default() -> Self {
        Self::new(CROP_PAD_X, CROP_PAD_Y)
    }
}
