use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};

use crate::detection::domain::face_estimator::{EstimationError, FaceEstimator};
use crate::shared::constants::REMOTE_JPEG_QUALITY;
use crate::shared::crop_region::CropRegion;
use crate::shared::detection_result::{DetectionResult, EstimatorSource};
use crate::shared::frame::Frame;
use crate::shared::landmark::{Landmark, LandmarkKind, Point};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct DetectRequest<'a> {
    image: String,
    video_path: &'a str,
}

#[derive(Deserialize)]
struct DetectResponse {
    #[serde(default)]
    landmarks: Vec<WireLandmark>,
    #[serde(default)]
    crop_region: Option<WireCrop>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct WireLandmark {
    x: f64,
    y: f64,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    confidence: f64,
}

#[derive(Deserialize)]
struct WireCrop {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// Estimation backend that ships JPEG-encoded frames to a remote detection
/// service.
///
/// Every failure shape (transport, non-success status, unparseable or
/// error-carrying payload) collapses into `RemoteDetectionFailed`. The
/// estimator never retries; per-tick fallback is the orchestrator's call.
pub struct RemoteFaceEstimator {
    client: reqwest::blocking::Client,
    endpoint: String,
    video_path: String,
    jpeg_quality: u8,
}

impl RemoteFaceEstimator {
    /// `endpoint` is the full detect URL (e.g. `http://host:5000/detect-face`);
    /// `video_path` identifies the source to the service.
    pub fn new(endpoint: impl Into<String>, video_path: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self {
            client,
            endpoint: endpoint.into(),
            video_path: video_path.into(),
            jpeg_quality: REMOTE_JPEG_QUALITY,
        }
    }

    fn encode_data_url(&self, frame: &Frame) -> Result<String, EstimationError> {
        let mut jpeg = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut jpeg, self.jpeg_quality);
        encoder
            .write_image(
                frame.data(),
                frame.width(),
                frame.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| EstimationError::RemoteDetectionFailed(format!("jpeg encode: {e}")))?;
        Ok(format!("data:image/jpeg;base64,{}", BASE64.encode(&jpeg)))
    }
}

fn parse_kind(kind: &str) -> Result<LandmarkKind, EstimationError> {
    match kind {
        "face" => Ok(LandmarkKind::FaceOutline),
        "mouth_outer" => Ok(LandmarkKind::MouthOuter),
        "mouth_inner" => Ok(LandmarkKind::MouthInner),
        "eye" => Ok(LandmarkKind::Eye),
        "nose" => Ok(LandmarkKind::Nose),
        other => Err(EstimationError::RemoteDetectionFailed(format!(
            "unknown landmark type {other:?}"
        ))),
    }
}

fn parse_response(
    payload: DetectResponse,
    frame_w: u32,
    frame_h: u32,
) -> Result<DetectionResult, EstimationError> {
    if let Some(error) = payload.error {
        return Err(EstimationError::RemoteDetectionFailed(error));
    }

    let mut landmarks = Vec::with_capacity(payload.landmarks.len());
    for wire in payload.landmarks {
        landmarks.push(Landmark::new(
            Point::new(wire.x, wire.y),
            parse_kind(&wire.kind)?,
            wire.confidence.clamp(0.0, 1.0),
        ));
    }

    // Re-clamp the service's crop so the containment invariant holds even
    // when it was computed against different dimensions
    let crop = payload.crop_region.map(|c| {
        CropRegion::clamped(
            c.x,
            c.y,
            c.x + c.width,
            c.y + c.height,
            frame_w as f64,
            frame_h as f64,
        )
    });

    Ok(DetectionResult::new(
        landmarks,
        crop,
        EstimatorSource::Remote,
    ))
}

impl FaceEstimator for RemoteFaceEstimator {
    fn estimate(&mut self, frame: &Frame) -> Result<DetectionResult, EstimationError> {
        let request = DetectRequest {
            image: self.encode_data_url(frame)?,
            video_path: &self.video_path,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| EstimationError::RemoteDetectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EstimationError::RemoteDetectionFailed(format!(
                "status {status}"
            )));
        }

        let payload: DetectResponse = response
            .json()
            .map_err(|e| EstimationError::RemoteDetectionFailed(e.to_string()))?;

        parse_response(payload, frame.width(), frame.height())
    }
}
