use thiserror::Error;

use crate::shared::detection_result::DetectionResult;
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum EstimationError {
    /// Transport failure, non-success status, or malformed payload from
    /// the remote detection service. All failure shapes collapse here; the
    /// caller applies the same per-tick fallback to each of them.
    #[error("remote detection failed: {0}")]
    RemoteDetectionFailed(String),
}

/// Seam between the orchestrator and an estimation backend.
///
/// Implementations may hold per-call state (network clients, jitter
/// sources), hence `&mut self`.
pub trait FaceEstimator: Send {
    fn estimate(&mut self, frame: &Frame) -> Result<DetectionResult, EstimationError>;
}
