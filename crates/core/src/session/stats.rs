use crate::shared::constants::FPS_CAP;

/// Per-session throughput counters.
///
/// `last_latency_ms` and `instantaneous_fps` are overwritten on every tick
/// with the instantaneous measurement; jitter is surfaced, not smoothed.
/// `frames_processed` only ever grows within one session.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ProcessingStats {
    pub frames_processed: u64,
    pub last_latency_ms: f64,
    pub instantaneous_fps: u32,
}

impl ProcessingStats {
    /// Records one processed frame with its measured estimation latency.
    pub fn record(&mut self, latency_ms: f64, fps_cap: u32) {
        self.frames_processed += 1;
        self.last_latency_ms = latency_ms;
        self.instantaneous_fps = instantaneous_fps(latency_ms, fps_cap);
    }
}

/// `round(1000 / latency)`, capped when the latency rounds to zero so a
/// fast tick reports the cap instead of infinity.
pub fn instantaneous_fps(latency_ms: f64, fps_cap: u32) -> u32 {
    if latency_ms.round() <= 0.0 {
        return fps_cap;
    }
    let fps = (1000.0 / latency_ms).round();
    (fps as u32).min(fps_cap)
}

/// The default fps cap used when no configuration overrides it.
pub const DEFAULT_FPS_CAP: u32 = FPS_CAP;
