use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use image::imageops::FilterType;
use image::RgbImage;
use thiserror::Error;

use crate::video::domain::video_source::{SourceUnavailable, VideoSource};

/// File extensions accepted when opening a directory of frames.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp"];

#[derive(Error, Debug)]
pub enum ImageSourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("no images found at {0}")]
    NoImages(PathBuf),
}

/// A playable [`VideoSource`] backed by still image files.
///
/// Frames advance on a wall-clock at the configured fps and loop at the end,
/// so a handful of stills behaves like an endlessly playing clip. Starts
/// paused; callers drive `play`/`pause` the way a page drives a video
/// element.
pub struct ImageSequenceSource {
    frames: Vec<RgbImage>,
    fps: f64,
    played: Duration,
    resumed_at: Option<Instant>,
}

impl ImageSequenceSource {
    /// Opens a single image file or a directory of image files
    /// (sorted by file name).
    pub fn open(path: &Path, fps: f64) -> Result<Self, ImageSourceError> {
        let mut paths: Vec<PathBuf> = if path.is_dir() {
            let entries = std::fs::read_dir(path).map_err(|e| ImageSourceError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
            entries
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| {
                    p.extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                })
                .collect()
        } else {
            vec![path.to_path_buf()]
        };
        paths.sort();

        let mut frames = Vec::with_capacity(paths.len());
        for p in &paths {
            let img = image::open(p)
                .map_err(|e| ImageSourceError::Decode {
                    path: p.clone(),
                    source: e,
                })?
                .to_rgb8();
            frames.push(img);
        }

        if frames.is_empty() {
            return Err(ImageSourceError::NoImages(path.to_path_buf()));
        }

        Ok(Self::from_frames(frames, fps))
    }

    /// Builds a source from already-decoded frames. Used by tests and
    /// callers that synthesize pictures.
    pub fn from_frames(frames: Vec<RgbImage>, fps: f64) -> Self {
        Self {
            frames,
            fps: fps.max(1.0),
            played: Duration::ZERO,
            resumed_at: None,
        }
    }

    pub fn play(&mut self) {
        if self.resumed_at.is_none() {
            self.resumed_at = Some(Instant::now());
        }
    }

    pub fn pause(&mut self) {
        if let Some(resumed) = self.resumed_at.take() {
            self.played += resumed.elapsed();
        }
    }

    fn current_frame(&self) -> &RgbImage {
        let elapsed_s = self.current_time_ms() / 1000.0;
        let index = (elapsed_s * self.fps) as usize % self.frames.len();
        &self.frames[index]
    }
}

impl VideoSource for ImageSequenceSource {
    fn dimensions(&self) -> (u32, u32) {
        match self.frames.first() {
            Some(f) => (f.width(), f.height()),
            None => (0, 0),
        }
    }

    fn is_ready(&self) -> bool {
        !self.frames.is_empty()
    }

    fn is_playing(&self) -> bool {
        self.resumed_at.is_some()
    }

    fn current_time_ms(&self) -> f64 {
        let live = self
            .resumed_at
            .map(|r| r.elapsed())
            .unwrap_or(Duration::ZERO);
        (self.played + live).as_secs_f64() * 1000.0
    }

    fn read_pixels(&mut self, width: u32, height: u32) -> Result<Vec<u8>, SourceUnavailable> {
        if self.frames.is_empty() {
            return Err(SourceUnavailable);
        }
        let frame = self.current_frame();
        if frame.width() == width && frame.height() == height {
            return Ok(frame.as_raw().clone());
        }
        let resized = image::imageops::resize(frame, width, height, FilterType::Triangle);
        Ok(resized.into_raw())
    }
}
