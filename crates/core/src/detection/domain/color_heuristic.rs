use crate::shared::constants::{DEFAULT_GRID_STRIDE, FACE_SIZE_FRACTION};
use crate::shared::frame::Frame;
use crate::shared::landmark::Point;

/// Fixed RGB rule deciding whether a sampled pixel is skin-like.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkinToneThresholds {
    pub r_min: u8,
    pub g_min: u8,
    pub b_min: u8,
    pub channel_spread_min: u8,
    pub rg_diff_min: u8,
}

impl Default for SkinToneThresholds {
    fn default() -> Self {
        Self {
            r_min: 95,
            g_min: 40,
            b_min: 20,
            channel_spread_min: 15,
            rg_diff_min: 15,
        }
    }
}

impl SkinToneThresholds {
    pub fn matches(&self, r: u8, g: u8, b: u8) -> bool {
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        r > self.r_min
            && g > self.g_min
            && b > self.b_min
            && max - min > self.channel_spread_min
            && r.abs_diff(g) > self.rg_diff_min
            && r > g
            && r > b
    }
}

/// Center and size estimate for the dominant face in a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceEstimate {
    pub center: Point,
    pub width: f64,
    pub height: f64,
}

/// Estimates a face center by scanning a sparse grid over the central 60%
/// of the frame for skin-like pixels.
///
/// This is a designed approximation, not a detector: only the center varies
/// with image content. The size is a fixed fraction of the smaller frame
/// dimension, and a frame with no skin-like samples degrades to the
/// geometric center rather than failing. It exists to keep the pipeline
/// functional when the remote service is unavailable.
pub struct ColorHeuristicEstimator {
    stride: usize,
    thresholds: SkinToneThresholds,
    size_fraction: f64,
}

impl ColorHeuristicEstimator {
    pub fn new(stride: usize, thresholds: SkinToneThresholds) -> Self {
        Self {
            stride: stride.max(1),
            thresholds,
            size_fraction: FACE_SIZE_FRACTION,
        }
    }

    pub fn estimate_face_region(&self, frame: &Frame) -> FaceEstimate {
        let width = frame.width() as f64;
        let height = frame.height() as f64;
        let pixels = frame.as_ndarray();

        let x_start = (width * 0.2) as usize;
        let x_end = (width * 0.8) as usize;
        let y_start = (height * 0.2) as usize;
        let y_end = (height * 0.8) as usize;

        let mut total_x = 0.0;
        let mut total_y = 0.0;
        let mut count = 0u32;

        for y in (y_start..y_end).step_by(self.stride) {
            for x in (x_start..x_end).step_by(self.stride) {
                let r = pixels[[y, x, 0]];
                let g = pixels[[y, x, 1]];
                let b = pixels[[y, x, 2]];
                if self.thresholds.matches(r, g, b) {
                    total_x += x as f64;
                    total_y += y as f64;
                    count += 1;
                }
            }
        }

        let center = if count > 0 {
            Point::new(total_x / count as f64, total_y / count as f64)
        } else {
            Point::new(width / 2.0, height / 2.0)
        };

        let base_size = width.min(height) * self.size_fraction;
        FaceEstimate {
            center,
            width: base_size,
            height: base_size * 1.2,
        }
    }
}

impl Default for ColorHeuristicEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_STRIDE, SkinToneThresholds::default())
    }
}
