/// An axis-aligned crop rectangle in frame-pixel units.
///
/// Invariant: fully inside the frame it was planned for (`x >= 0`, `y >= 0`,
/// `x + width <= frame_w`, `y + height <= frame_h`, non-negative dimensions).
/// A zero-area region means "no region found" and must be treated as absent
/// by consumers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRegion {
    /// Builds a region from unclamped edges, clamping each edge into
    /// `[0, frame]` independently. Never produces negative dimensions,
    /// even when the unclamped box lies entirely outside the frame.
    pub fn clamped(x1: f64, y1: f64, x2: f64, y2: f64, frame_w: f64, frame_h: f64) -> Self {
        let cx1 = x1.clamp(0.0, frame_w);
        let cy1 = y1.clamp(0.0, frame_h);
        let cx2 = x2.clamp(0.0, frame_w);
        let cy2 = y2.clamp(0.0, frame_h);
        Self {
            x: cx1,
            y: cy1,
            width: (cx2 - cx1).max(0.0),
            height: (cy2 - cy1).max(0.0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether the region satisfies its containment invariant for the
    /// given frame dimensions.
    pub fn is_within(&self, frame_w: f64, frame_h: f64) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.width >= 0.0
            && self.height >= 0.0
            && self.x + self.width <= frame_w
            && self.y + self.height <= frame_h
    }
}
