use crate::shared::crop_region::CropRegion;
use crate::shared::landmark::Point;

/// An opaque RGB color. Opacity is passed separately where a primitive
/// supports it, so the same palette works on surfaces without blending.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Drawing target for the overlay renderer.
///
/// The renderer stays a pure mapping from detection state to draw calls;
/// rasterization, blending, and text shaping live behind this trait.
pub trait RenderSurface {
    /// Replaces the surface contents with the frame's pixels.
    fn draw_frame(&mut self, data: &[u8], width: u32, height: u32);

    /// Filled dot, `alpha` in `[0, 1]` blended over existing content.
    fn fill_circle(&mut self, center: Point, radius: f64, color: Color, alpha: f64);

    /// Rectangle outline with a `(dash, gap)` pattern in pixels.
    fn stroke_dashed_rect(&mut self, rect: &CropRegion, color: Color, dash: (f64, f64));

    /// Single line of text with `anchor` as the baseline start. Surfaces
    /// without font support may ignore this.
    fn draw_label(&mut self, text: &str, anchor: Point, color: Color);
}
