/// Default detection cycle period (~10 Hz processing).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Fallback frame dimensions when a source reports zero (not yet loaded).
pub const DEFAULT_FRAME_WIDTH: u32 = 640;
pub const DEFAULT_FRAME_HEIGHT: u32 = 480;

/// Sparse sampling stride for the skin-tone scan, in pixels.
pub const DEFAULT_GRID_STRIDE: usize = 10;

/// Face size as a fraction of the smaller frame dimension.
pub const FACE_SIZE_FRACTION: f64 = 0.3;

/// Crop padding around the mouth bounding box, per side.
pub const CROP_PAD_X: f64 = 30.0;
pub const CROP_PAD_Y: f64 = 25.0;

/// Reported fps when a tick's measured latency rounds to zero.
pub const FPS_CAP: u32 = 1000;

/// Landmark counts per synthesis call.
pub const OUTLINE_POINTS: usize = 17;
pub const MOUTH_OUTER_POINTS: usize = 12;
pub const MOUTH_INNER_POINTS: usize = 8;
pub const EYE_POINTS_PER_SIDE: usize = 6;

/// Detection endpoint path on the remote service.
pub const DETECT_FACE_PATH: &str = "/detect-face";

/// JPEG quality for frames shipped to the remote service.
pub const REMOTE_JPEG_QUALITY: u8 = 80;
