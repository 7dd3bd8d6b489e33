pub mod overlay_renderer;
pub mod render_surface;
