use crate::detection::domain::color_heuristic::ColorHeuristicEstimator;
use crate::detection::domain::crop_planner::CropPlanner;
use crate::detection::domain::face_estimator::{EstimationError, FaceEstimator};
use crate::detection::domain::landmark_synthesizer::LandmarkSynthesizer;
use crate::shared::detection_result::{DetectionResult, EstimatorSource};
use crate::shared::frame::Frame;

/// The local estimation backend: skin-tone heuristic, parametric landmark
/// synthesis, then mouth crop planning.
///
/// Never fails: the heuristic degrades to the frame center and the
/// synthesizer always yields a full landmark set, so every frame produces
/// a usable result. This is the fallback that keeps the pipeline alive when
/// the remote service is down.
pub struct LocalFaceEstimator {
    heuristic: ColorHeuristicEstimator,
    synthesizer: LandmarkSynthesizer,
    planner: CropPlanner,
}

impl LocalFaceEstimator {
    pub fn new(
        heuristic: ColorHeuristicEstimator,
        synthesizer: LandmarkSynthesizer,
        planner: CropPlanner,
    ) -> Self {
        Self {
            heuristic,
            synthesizer,
            planner,
        }
    }
}

impl FaceEstimator for LocalFaceEstimator {
    fn estimate(&mut self, frame: &Frame) -> Result<DetectionResult, EstimationError> {
        let estimate = self.heuristic.estimate_face_region(frame);
        let landmarks = self.synthesizer.synthesize(&estimate);
        let crop = self.planner.plan(&landmarks, frame.width(), frame.height());
        Ok(DetectionResult::new(
            landmarks,
            crop,
            EstimatorSource::Local,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::color_heuristic::SkinToneThresholds;
    use crate::detection::domain::confidence_jitter::SeededJitter;

    fn estimator() -> LocalFaceEstimator {
        LocalFaceEstimator::new(
            ColorHeuristicEstimator::new(10, SkinToneThresholds::default()),
            LandmarkSynthesizer::new(Box::new(SeededJitter::from_seed(1))),
            CropPlanner::default(),
        )
    }

    fn black_frame(w: u32, h: u32) -> Frame {
        Frame::new(vec![0u8; (w * h * 3) as usize], w, h, 3, 0, 0.0)
    }

    #[test]
    fn test_always_produces_full_result() {
        let result = estimator().estimate(&black_frame(640, 480)).unwrap();
        assert_eq!(result.landmarks.len(), 49);
        assert_eq!(result.source, EstimatorSource::Local);
        // The synthesized set always carries mouth points, so a crop is
        // always planned
        assert!(result.crop().is_some());
    }

    #[test]
    fn test_crop_respects_frame_bounds() {
        // Tiny frame forces heavy clamping
        let result = estimator().estimate(&black_frame(64, 48)).unwrap();
        let crop = result.crop.unwrap();
        assert!(crop.is_within(64.0, 48.0));
    }

    #[test]
    fn test_deterministic_with_seeded_jitter() {
        let frame = black_frame(320, 240);
        let a = estimator().estimate(&frame).unwrap();
        let b = estimator().estimate(&frame).unwrap();
        assert_eq!(a, b);
    }
}
