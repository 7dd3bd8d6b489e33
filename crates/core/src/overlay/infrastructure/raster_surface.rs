use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_text_mut, Blend};
use thiserror::Error;

use crate::overlay::domain::render_surface::{Color, RenderSurface};
use crate::shared::crop_region::CropRegion;
use crate::shared::landmark::Point;

const STROKE_WIDTH: u32 = 2;
const LABEL_SCALE: f32 = 14.0;

#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("failed to write overlay image: {0}")]
    Write(#[from] image::ImageError),
}

/// CPU raster implementation of [`RenderSurface`] on an RGBA canvas.
///
/// Circles are alpha-blended over the frame; strokes and text are opaque.
/// Text needs a font: construct via [`RasterSurface::with_font`] to get
/// labels, otherwise `draw_label` is a no-op.
pub struct RasterSurface {
    canvas: Blend<RgbaImage>,
    font: Option<FontVec>,
}

impl RasterSurface {
    pub fn new() -> Self {
        Self {
            canvas: Blend(RgbaImage::new(0, 0)),
            font: None,
        }
    }

    pub fn with_font(font: FontVec) -> Self {
        Self {
            canvas: Blend(RgbaImage::new(0, 0)),
            font: Some(font),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas.0
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SurfaceError> {
        self.canvas.0.save(path)?;
        Ok(())
    }
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self::new()
    }
}

fn opaque(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, 255])
}

/// Draws the `(on, off)` dash pattern along one edge, thickened to
/// `STROKE_WIDTH` with parallel passes along the edge normal.
fn dashed_line(
    canvas: &mut Blend<RgbaImage>,
    start: (f32, f32),
    end: (f32, f32),
    dash: (f64, f64),
    color: Rgba<u8>,
) {
    let (dx, dy) = (end.0 - start.0, end.1 - start.1);
    let length = (dx * dx + dy * dy).sqrt();
    if length <= f32::EPSILON {
        return;
    }
    let (ux, uy) = (dx / length, dy / length);
    let (nx, ny) = (-uy, ux);
    let (on, off) = (dash.0 as f32, dash.1 as f32);

    let mut t = 0.0f32;
    while t < length {
        let seg_end = (t + on).min(length);
        for pass in 0..STROKE_WIDTH {
            let (ox, oy) = (nx * pass as f32, ny * pass as f32);
            draw_line_segment_mut(
                canvas,
                (start.0 + ux * t + ox, start.1 + uy * t + oy),
                (start.0 + ux * seg_end + ox, start.1 + uy * seg_end + oy),
                color,
            );
        }
        t = seg_end + off;
    }
}

impl RenderSurface for RasterSurface {
    fn draw_frame(&mut self, data: &[u8], width: u32, height: u32) {
        let mut img = RgbaImage::new(width, height);
        for (px, rgb) in img.pixels_mut().zip(data.chunks_exact(3)) {
            *px = Rgba([rgb[0], rgb[1], rgb[2], 255]);
        }
        self.canvas = Blend(img);
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color, alpha: f64) {
        let alpha = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        draw_filled_circle_mut(
            &mut self.canvas,
            (center.x.round() as i32, center.y.round() as i32),
            radius.round() as i32,
            Rgba([color.r, color.g, color.b, alpha]),
        );
    }

    fn stroke_dashed_rect(&mut self, rect: &CropRegion, color: Color, dash: (f64, f64)) {
        let color = opaque(color);
        let (x0, y0) = (rect.x as f32, rect.y as f32);
        let (x1, y1) = ((rect.x + rect.width) as f32, (rect.y + rect.height) as f32);
        dashed_line(&mut self.canvas, (x0, y0), (x1, y0), dash, color);
        dashed_line(&mut self.canvas, (x1, y0), (x1, y1), dash, color);
        dashed_line(&mut self.canvas, (x1, y1), (x0, y1), dash, color);
        dashed_line(&mut self.canvas, (x0, y1), (x0, y0), dash, color);
    }

    fn draw_label(&mut self, text: &str, anchor: Point, color: Color) {
        let Some(font) = &self.font else {
            return;
        };
        // The anchor is a baseline; draw_text wants the glyph top
        let top = (anchor.y - f64::from(LABEL_SCALE)).round() as i32;
        draw_text_mut(
            &mut self.canvas,
            opaque(color),
            anchor.x.round() as i32,
            top,
            PxScale::from(LABEL_SCALE),
            font,
            text,
        );
    }
}
