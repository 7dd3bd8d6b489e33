use thiserror::Error;

/// The video source was not ready to deliver pixels (not yet decoding,
/// or its backing data is gone). Callers skip the cycle rather than fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("video source is not ready")]
pub struct SourceUnavailable;

/// Boundary to a playable video element or handle.
///
/// The core never manages playback itself; it only reads dimensions,
/// play state, the source clock, and pixels. Implementations handle
/// decode/scaling details.
pub trait VideoSource: Send {
    /// Native dimensions. May be `(0, 0)` before the source has loaded.
    fn dimensions(&self) -> (u32, u32);

    /// Whether the source has started decoding and can deliver pixels.
    fn is_ready(&self) -> bool;

    /// Whether the source is actively playing (not paused or ended).
    fn is_playing(&self) -> bool;

    /// Playback clock position in milliseconds.
    fn current_time_ms(&self) -> f64;

    /// Reads the current picture as RGB bytes scaled to `width` x `height`.
    fn read_pixels(&mut self, width: u32, height: u32) -> Result<Vec<u8>, SourceUnavailable>;
}
