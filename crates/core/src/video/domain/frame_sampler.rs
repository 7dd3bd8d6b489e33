use crate::shared::constants::{DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH};
use crate::shared::frame::Frame;

use super::video_source::{SourceUnavailable, VideoSource};

const RGB_CHANNELS: u8 = 3;

/// Extracts still frames from a live video source.
///
/// Captured frames match the source's native dimensions, falling back to a
/// configured default when the source reports zero (not yet loaded). The
/// sampler stamps each frame with a running index and the source clock.
pub struct FrameSampler {
    default_width: u32,
    default_height: u32,
    captured: usize,
}

impl FrameSampler {
    pub fn new(default_width: u32, default_height: u32) -> Self {
        Self {
            default_width,
            default_height,
            captured: 0,
        }
    }

    /// Captures one frame, or `SourceUnavailable` when the source is not
    /// ready; callers skip the cycle rather than treat this as fatal.
    pub fn capture(&mut self, source: &mut dyn VideoSource) -> Result<Frame, SourceUnavailable> {
        if !source.is_ready() {
            return Err(SourceUnavailable);
        }

        let (mut width, mut height) = source.dimensions();
        if width == 0 || height == 0 {
            width = self.default_width;
            height = self.default_height;
        }

        let data = source.read_pixels(width, height)?;
        let frame = Frame::new(
            data,
            width,
            height,
            RGB_CHANNELS,
            self.captured,
            source.current_time_ms(),
        );
        self.captured += 1;
        Ok(frame)
    }

    /// Frames captured so far by this sampler.
    pub fn captured(&self) -> usize {
        self.captured
    }
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_WIDTH, DEFAULT_FRAME_HEIGHT)
    }
}
