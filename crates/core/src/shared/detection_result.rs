use super::crop_region::CropRegion;
use super::landmark::Landmark;

/// Which estimation strategy produced a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EstimatorSource {
    Remote,
    Local,
}

/// The output of one processed frame: the landmark set, the planned mouth
/// crop (if any), and which backend produced it.
///
/// Produced fresh per tick and never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionResult {
    pub landmarks: Vec<Landmark>,
    pub crop: Option<CropRegion>,
    pub source: EstimatorSource,
}

impl DetectionResult {
    pub fn new(
        landmarks: Vec<Landmark>,
        crop: Option<CropRegion>,
        source: EstimatorSource,
    ) -> Self {
        Self {
            landmarks,
            crop,
            source,
        }
    }

    /// The crop, with empty regions treated as absent.
    pub fn crop(&self) -> Option<&CropRegion> {
        self.crop.as_ref().filter(|c| !c.is_empty())
    }
}
