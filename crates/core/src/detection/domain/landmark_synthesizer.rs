use std::f64::consts::PI;

use crate::shared::constants::{
    EYE_POINTS_PER_SIDE, MOUTH_INNER_POINTS, MOUTH_OUTER_POINTS, OUTLINE_POINTS,
};
use crate::shared::landmark::{Landmark, LandmarkKind, Point};

use super::color_heuristic::FaceEstimate;
use super::confidence_jitter::ConfidenceJitter;

/// Mouth points carry a higher confidence base than outline and eye points:
/// they are the load-bearing estimates for the downstream lip-reading task
/// and should read as relatively more trustworthy even though the whole set
/// is synthetic.
const OUTLINE_CONFIDENCE: (f64, f64) = (0.8, 0.2);
const MOUTH_OUTER_CONFIDENCE: (f64, f64) = (0.9, 0.1);
const MOUTH_INNER_CONFIDENCE: (f64, f64) = (0.85, 0.15);
const EYE_CONFIDENCE: (f64, f64) = (0.8, 0.2);

const MOUTH_OUTER_AMPLITUDE: f64 = 15.0;
const MOUTH_INNER_AMPLITUDE: f64 = 8.0;
const EYE_RADIUS_X: f64 = 12.0;
const EYE_RADIUS_Y: f64 = 6.0;

/// Synthesizes a fixed 49-point parametric landmark layout around a face
/// estimate: 17 outline, 12 mouth-outer, 8 mouth-inner, and 6 points per
/// eye. Deterministic except for the injected confidence jitter.
///
/// The half-axis factors (0.4 / 0.35) compound with the estimator's 0.3
/// size fraction, so the synthesized face sits well inside the estimate.
pub struct LandmarkSynthesizer {
    jitter: Box<dyn ConfidenceJitter>,
}

impl LandmarkSynthesizer {
    pub fn new(jitter: Box<dyn ConfidenceJitter>) -> Self {
        Self { jitter }
    }

    pub fn synthesize(&mut self, estimate: &FaceEstimate) -> Vec<Landmark> {
        let cx = estimate.center.x;
        let cy = estimate.center.y;
        let face_w = estimate.width * 0.4;
        let face_h = estimate.height * 0.35;

        let mut landmarks =
            Vec::with_capacity(OUTLINE_POINTS + MOUTH_OUTER_POINTS + MOUTH_INNER_POINTS + 12);

        // Face outline: lower half-ellipse from -pi/2 to pi/2, shifted down
        for i in 0..OUTLINE_POINTS {
            let t = i as f64 / (OUTLINE_POINTS - 1) as f64;
            let angle = t * PI - PI / 2.0;
            landmarks.push(Landmark::new(
                Point::new(
                    cx + angle.cos() * face_w,
                    cy + angle.sin() * face_h + face_h * 0.1,
                ),
                LandmarkKind::FaceOutline,
                self.confidence(OUTLINE_CONFIDENCE),
            ));
        }

        let mouth_y = cy + face_h * 0.3;
        let mouth_w = face_w * 0.4;

        for i in 0..MOUTH_OUTER_POINTS {
            let t = i as f64 / (MOUTH_OUTER_POINTS - 1) as f64;
            let angle = t * PI;
            landmarks.push(Landmark::new(
                Point::new(
                    cx + angle.cos() * mouth_w,
                    mouth_y + angle.sin() * MOUTH_OUTER_AMPLITUDE,
                ),
                LandmarkKind::MouthOuter,
                self.confidence(MOUTH_OUTER_CONFIDENCE),
            ));
        }

        for i in 0..MOUTH_INNER_POINTS {
            let t = i as f64 / (MOUTH_INNER_POINTS - 1) as f64;
            let angle = t * PI;
            landmarks.push(Landmark::new(
                Point::new(
                    cx + angle.cos() * mouth_w * 0.7,
                    mouth_y + angle.sin() * MOUTH_INNER_AMPLITUDE,
                ),
                LandmarkKind::MouthInner,
                self.confidence(MOUTH_INNER_CONFIDENCE),
            ));
        }

        for side in [-1.0, 1.0] {
            let eye_x = cx + side * face_w * 0.3;
            let eye_y = cy - face_h * 0.1;
            for i in 0..EYE_POINTS_PER_SIDE {
                let angle = (i as f64 / EYE_POINTS_PER_SIDE as f64) * 2.0 * PI;
                landmarks.push(Landmark::new(
                    Point::new(
                        eye_x + angle.cos() * EYE_RADIUS_X,
                        eye_y + angle.sin() * EYE_RADIUS_Y,
                    ),
                    LandmarkKind::Eye,
                    self.confidence(EYE_CONFIDENCE),
                ));
            }
        }

        landmarks
    }

    fn confidence(&mut self, (base, spread): (f64, f64)) -> f64 {
        base + self.jitter.sample() * spread
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Jitter returning a fixed value so confidences are exact.
    struct FixedJitter(f64);

    impl ConfidenceJitter for FixedJitter {
        fn sample(&mut self) -> f64 {
            self.0
        }
    }

    fn estimate() -> FaceEstimate {
        FaceEstimate {
            center: Point::new(320.0, 240.0),
            width: 144.0,  // 480 * 0.3
            height: 172.8, // width * 1.2
        }
    }

    fn synthesizer(jitter: f64) -> LandmarkSynthesizer {
        LandmarkSynthesizer::new(Box::new(FixedJitter(jitter)))
    }

    fn count(landmarks: &[Landmark], kind: LandmarkKind) -> usize {
        landmarks.iter().filter(|l| l.kind == kind).count()
    }

    #[test]
    fn test_exactly_49_landmarks() {
        let landmarks = synthesizer(0.0).synthesize(&estimate());
        assert_eq!(landmarks.len(), 49);
        assert_eq!(count(&landmarks, LandmarkKind::FaceOutline), 17);
        assert_eq!(count(&landmarks, LandmarkKind::MouthOuter), 12);
        assert_eq!(count(&landmarks, LandmarkKind::MouthInner), 8);
        assert_eq!(count(&landmarks, LandmarkKind::Eye), 12);
        assert_eq!(count(&landmarks, LandmarkKind::Nose), 0);
    }

    #[test]
    fn test_confidence_bases_per_kind() {
        let landmarks = synthesizer(0.0).synthesize(&estimate());
        for lm in &landmarks {
            let expected = match lm.kind {
                LandmarkKind::MouthOuter => 0.9,
                LandmarkKind::MouthInner => 0.85,
                _ => 0.8,
            };
            assert_relative_eq!(lm.confidence, expected);
        }
    }

    #[test]
    fn test_confidence_spread_per_kind() {
        // Jitter pinned at 1.0 exposes base + spread; every kind tops out
        // at exactly 1.0 (0.8+0.2, 0.9+0.1, 0.85+0.15)
        let landmarks = synthesizer(1.0).synthesize(&estimate());
        for lm in &landmarks {
            assert_relative_eq!(lm.confidence, 1.0);
        }
    }

    #[test]
    fn test_outline_endpoints() {
        let est = estimate();
        let landmarks = synthesizer(0.0).synthesize(&est);
        let face_w = est.width * 0.4;
        let face_h = est.height * 0.35;

        // First outline point: angle -pi/2 -> (cx, cy - face_h + 0.1*face_h)
        let first = &landmarks[0];
        assert_relative_eq!(first.position.x, 320.0, epsilon = 1e-9);
        assert_relative_eq!(first.position.y, 240.0 - face_h + face_h * 0.1, epsilon = 1e-9);

        // Last outline point: angle +pi/2 -> (cx, cy + face_h + 0.1*face_h)
        let last = &landmarks[16];
        assert_relative_eq!(last.position.x, 320.0, epsilon = 1e-9);
        assert_relative_eq!(last.position.y, 240.0 + face_h + face_h * 0.1, epsilon = 1e-9);

        // Middle point: angle 0 -> (cx + face_w, ...)
        let mid = &landmarks[8];
        assert_relative_eq!(mid.position.x, 320.0 + face_w, epsilon = 1e-6);
    }

    #[test]
    fn test_mouth_row_geometry() {
        let est = estimate();
        let landmarks = synthesizer(0.0).synthesize(&est);
        let face_w = est.width * 0.4;
        let face_h = est.height * 0.35;
        let mouth_y = 240.0 + face_h * 0.3;
        let mouth_w = face_w * 0.4;

        // First outer mouth point: angle 0 -> (cx + mouth_w, mouth_y)
        let outer_first = &landmarks[17];
        assert_eq!(outer_first.kind, LandmarkKind::MouthOuter);
        assert_relative_eq!(outer_first.position.x, 320.0 + mouth_w, epsilon = 1e-9);
        assert_relative_eq!(outer_first.position.y, mouth_y, epsilon = 1e-9);

        // Last outer mouth point: angle pi -> (cx - mouth_w, mouth_y)
        let outer_last = &landmarks[17 + 11];
        assert_relative_eq!(outer_last.position.x, 320.0 - mouth_w, epsilon = 1e-9);

        // Inner mouth is the same half-ellipse scaled by 0.7
        let inner_first = &landmarks[17 + 12];
        assert_eq!(inner_first.kind, LandmarkKind::MouthInner);
        assert_relative_eq!(inner_first.position.x, 320.0 + mouth_w * 0.7, epsilon = 1e-9);
    }

    #[test]
    fn test_eye_clusters_symmetric() {
        let est = estimate();
        let landmarks = synthesizer(0.0).synthesize(&est);
        let face_w = est.width * 0.4;
        let eyes: Vec<_> = landmarks
            .iter()
            .filter(|l| l.kind == LandmarkKind::Eye)
            .collect();
        assert_eq!(eyes.len(), 12);

        // First point of each ring sits at angle 0: center + radius_x
        let left_first = eyes[0];
        let right_first = eyes[6];
        assert_relative_eq!(
            left_first.position.x,
            320.0 - face_w * 0.3 + EYE_RADIUS_X,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            right_first.position.x,
            320.0 + face_w * 0.3 + EYE_RADIUS_X,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_order_stable_across_calls() {
        let a = synthesizer(0.5).synthesize(&estimate());
        let b = synthesizer(0.5).synthesize(&estimate());
        assert_eq!(a, b);
    }
}
