/// A point in frame-pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Anatomical category of an estimated or synthesized landmark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LandmarkKind {
    FaceOutline,
    MouthOuter,
    MouthInner,
    Eye,
    Nose,
}

impl LandmarkKind {
    /// Mouth-region landmarks drive the crop; everything else is
    /// visualization only.
    pub fn is_mouth(self) -> bool {
        matches!(self, LandmarkKind::MouthOuter | LandmarkKind::MouthInner)
    }
}

/// One estimated reference point with a confidence score in `[0, 1]`.
///
/// Landmark sets are ordered sequences; the order is stable per synthesis
/// call but carries no meaning beyond grouping by kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmark {
    pub position: Point,
    pub kind: LandmarkKind,
    pub confidence: f64,
}

impl Landmark {
    pub fn new(position: Point, kind: LandmarkKind, confidence: f64) -> Self {
        Self {
            position,
            kind,
            confidence,
        }
    }
}
