use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, select, tick, Sender};
use thiserror::Error;

use crate::detection::domain::face_estimator::FaceEstimator;
use crate::shared::constants::{DEFAULT_TICK_INTERVAL_MS, FPS_CAP};
use crate::shared::detection_result::{DetectionResult, EstimatorSource};
use crate::shared::frame::Frame;
use crate::video::domain::frame_sampler::FrameSampler;
use crate::video::domain::video_source::VideoSource;

use super::detection_session::{BackendMode, DetectionSession, SessionState};

/// A video source shared between the caller (who drives playback) and the
/// orchestrator's tick loop.
pub type SharedVideoSource = Arc<Mutex<dyn VideoSource>>;

#[derive(Error, Debug)]
pub enum SessionError {
    /// `start` was called before any source was bound. The one condition
    /// in this subsystem that must be reported to the user.
    #[error("no video source bound")]
    NoSourceBound,
}

#[derive(Clone, Copy, Debug)]
pub struct OrchestratorConfig {
    pub tick_interval: Duration,
    pub fps_cap: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            fps_cap: FPS_CAP,
        }
    }
}

struct BackendPair {
    remote: Option<Box<dyn FaceEstimator>>,
    local: Box<dyn FaceEstimator>,
}

struct Worker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

/// Context moved into the tick loop thread. `epoch` is the generation
/// token: any session-mutating write first checks that the live counter
/// still equals the epoch this worker was started with, so results from
/// calls left in flight across a `stop` or source switch are discarded
/// instead of overwriting the next session.
struct WorkerCtx {
    session: Arc<Mutex<DetectionSession>>,
    backends: Arc<Mutex<BackendPair>>,
    source: SharedVideoSource,
    epoch: Arc<AtomicU64>,
    my_epoch: u64,
    fps_cap: u32,
}

/// Drives the periodic detection cycle over a bound video source.
///
/// Lifecycle is `Idle -> Running -> Idle`; ticks are serial (an overlapping
/// tick is skipped, never queued), and each tick runs the configured backend
/// with per-tick fallback from `Remote` to the local pipeline on failure.
/// The orchestrator is the only component with lifecycle state; everything
/// downstream is a pure function of its frame.
pub struct DetectionOrchestrator {
    config: OrchestratorConfig,
    session: Arc<Mutex<DetectionSession>>,
    backends: Arc<Mutex<BackendPair>>,
    source: Option<SharedVideoSource>,
    epoch: Arc<AtomicU64>,
    worker: Option<Worker>,
}

impl DetectionOrchestrator {
    pub fn new(
        local: Box<dyn FaceEstimator>,
        remote: Option<Box<dyn FaceEstimator>>,
        mode: BackendMode,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            config,
            session: Arc::new(Mutex::new(DetectionSession::new(mode))),
            backends: Arc::new(Mutex::new(BackendPair { remote, local })),
            source: None,
            epoch: Arc::new(AtomicU64::new(0)),
            worker: None,
        }
    }

    /// Binds the source the session will sample. Implicitly stops a running
    /// session: detection never silently carries over to a new source.
    pub fn bind_source(&mut self, source: SharedVideoSource) {
        self.stop();
        self.source = Some(source);
    }

    /// Switches the preferred backend for subsequent ticks.
    pub fn set_mode(&mut self, mode: BackendMode) {
        if let Ok(mut session) = self.session.lock() {
            session.mode = mode;
        }
    }

    /// Begins the periodic cycle. No-op (not an error) when already
    /// running; resets stats and the last result for the new session.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.worker.is_some() {
            return Ok(());
        }
        let source = self.source.clone().ok_or(SessionError::NoSourceBound)?;

        let my_epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut session) = self.session.lock() {
            session.stats = Default::default();
            session.last_result = None;
            session.state = SessionState::Running;
        }

        let ctx = WorkerCtx {
            session: self.session.clone(),
            backends: self.backends.clone(),
            source,
            epoch: self.epoch.clone(),
            my_epoch,
            fps_cap: self.config.fps_cap,
        };
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let interval = self.config.tick_interval;

        let handle = std::thread::spawn(move || {
            let mut sampler = FrameSampler::default();
            // Capacity-1 tick channel: missed ticks are dropped, so a slow
            // estimation call never builds a backlog
            let ticker = tick(interval);
            loop {
                select! {
                    recv(stop_rx) -> _ => break,
                    recv(ticker) -> _ => {
                        if ctx.epoch.load(Ordering::SeqCst) != ctx.my_epoch {
                            break;
                        }
                        run_tick(&ctx, &mut sampler);
                    }
                }
            }
        });

        self.worker = Some(Worker { stop_tx, handle });
        Ok(())
    }

    /// Returns to `Idle` from any state; no-op when already idle. Stats and
    /// the last result stay visible until the next `start`. Safe while a
    /// remote call is in flight: the epoch bump below invalidates its
    /// result, and the join is bounded by that one call.
    pub fn stop(&mut self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
            let _ = worker.handle.join();
        }
        if let Ok(mut session) = self.session.lock() {
            session.state = SessionState::Idle;
        }
    }

    /// Snapshot of the live session for callers and renderers.
    pub fn session(&self) -> DetectionSession {
        match self.session.lock() {
            Ok(session) => session.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for DetectionOrchestrator {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_tick(ctx: &WorkerCtx, sampler: &mut FrameSampler) {
    // Sample under the source lock, then release it for the (possibly slow)
    // estimation call
    let frame = {
        let Ok(mut source) = ctx.source.lock() else {
            return;
        };
        if !source.is_playing() {
            return;
        }
        match sampler.capture(&mut *source) {
            Ok(frame) => frame,
            Err(_) => {
                log::debug!("video source not ready; skipping tick");
                return;
            }
        }
    };

    let mode = match ctx.session.lock() {
        Ok(session) => session.mode,
        Err(_) => return,
    };

    let started = Instant::now();
    let result = estimate_once(&ctx.backends, mode, &frame);
    let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

    // Stale-result guard: a stop or source switch happened mid-call
    if ctx.epoch.load(Ordering::SeqCst) != ctx.my_epoch {
        log::debug!("discarding result from superseded session");
        return;
    }

    let Ok(mut session) = ctx.session.lock() else {
        return;
    };
    if session.state != SessionState::Running {
        return;
    }
    session.stats.record(latency_ms, ctx.fps_cap);
    session.last_result = Some(result);
}

fn estimate_once(
    backends: &Mutex<BackendPair>,
    mode: BackendMode,
    frame: &Frame,
) -> DetectionResult {
    let empty = || DetectionResult::new(Vec::new(), None, EstimatorSource::Local);
    let Ok(mut pair) = backends.lock() else {
        return empty();
    };

    match mode {
        BackendMode::Local => pair.local.estimate(frame).unwrap_or_else(|_| empty()),
        BackendMode::Remote => {
            match pair.remote.as_mut().map(|remote| remote.estimate(frame)) {
                Some(Ok(result)) => result,
                Some(Err(e)) => {
                    log::warn!("remote detection failed, falling back to local: {e}");
                    pair.local.estimate(frame).unwrap_or_else(|_| empty())
                }
                None => pair.local.estimate(frame).unwrap_or_else(|_| empty()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::face_estimator::EstimationError;
    use crate::shared::landmark::{Landmark, LandmarkKind, Point};
    use crate::video::domain::video_source::SourceUnavailable;
    use std::sync::atomic::AtomicBool;

    const TICK: Duration = Duration::from_millis(10);

    fn config() -> OrchestratorConfig {
        OrchestratorConfig {
            tick_interval: TICK,
            fps_cap: FPS_CAP,
        }
    }

    // --- Stubs ---

    struct StubSource {
        playing: Arc<AtomicBool>,
        ready: bool,
    }

    impl StubSource {
        fn playing() -> (SharedVideoSource, Arc<AtomicBool>) {
            let flag = Arc::new(AtomicBool::new(true));
            let source: SharedVideoSource = Arc::new(Mutex::new(StubSource {
                playing: flag.clone(),
                ready: true,
            }));
            (source, flag)
        }
    }

    impl VideoSource for StubSource {
        fn dimensions(&self) -> (u32, u32) {
            (64, 48)
        }

        fn is_ready(&self) -> bool {
            self.ready
        }

        fn is_playing(&self) -> bool {
            self.playing.load(Ordering::Relaxed)
        }

        fn current_time_ms(&self) -> f64 {
            0.0
        }

        fn read_pixels(&mut self, width: u32, height: u32) -> Result<Vec<u8>, SourceUnavailable> {
            Ok(vec![0u8; (width * height * 3) as usize])
        }
    }

    /// Estimator producing a marker landmark so tests can tell results apart.
    struct MarkerEstimator {
        marker_x: f64,
        source: EstimatorSource,
        delay: Duration,
    }

    impl MarkerEstimator {
        fn new(marker_x: f64, source: EstimatorSource) -> Self {
            Self {
                marker_x,
                source,
                delay: Duration::ZERO,
            }
        }

        fn slow(marker_x: f64, source: EstimatorSource, delay: Duration) -> Self {
            Self {
                delay,
                ..Self::new(marker_x, source)
            }
        }
    }

    impl FaceEstimator for MarkerEstimator {
        fn estimate(&mut self, _frame: &Frame) -> Result<DetectionResult, EstimationError> {
            if !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }
            Ok(DetectionResult::new(
                vec![Landmark::new(
                    Point::new(self.marker_x, 0.0),
                    LandmarkKind::MouthOuter,
                    1.0,
                )],
                None,
                self.source,
            ))
        }
    }

    struct FailingRemote;

    impl FaceEstimator for FailingRemote {
        fn estimate(&mut self, _frame: &Frame) -> Result<DetectionResult, EstimationError> {
            Err(EstimationError::RemoteDetectionFailed(
                "connection refused".into(),
            ))
        }
    }

    fn local() -> Box<dyn FaceEstimator> {
        Box::new(MarkerEstimator::new(1.0, EstimatorSource::Local))
    }

    fn wait_for_frames(orchestrator: &DetectionOrchestrator, at_least: u64) {
        for _ in 0..200 {
            if orchestrator.session().stats.frames_processed >= at_least {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!(
            "timed out waiting for {at_least} frames (got {})",
            orchestrator.session().stats.frames_processed
        );
    }

    // --- Lifecycle ---

    #[test]
    fn test_start_without_source_is_reported() {
        let mut orchestrator =
            DetectionOrchestrator::new(local(), None, BackendMode::Local, config());
        assert!(matches!(
            orchestrator.start(),
            Err(SessionError::NoSourceBound)
        ));
        assert!(!orchestrator.is_running());
    }

    #[test]
    fn test_stop_while_idle_is_noop() {
        let mut orchestrator =
            DetectionOrchestrator::new(local(), None, BackendMode::Local, config());
        let before = orchestrator.session();
        orchestrator.stop();
        assert_eq!(orchestrator.session(), before);
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let (source, _playing) = StubSource::playing();
        let mut orchestrator =
            DetectionOrchestrator::new(local(), None, BackendMode::Local, config());
        orchestrator.bind_source(source);
        orchestrator.start().unwrap();
        wait_for_frames(&orchestrator, 2);

        let frames_before = orchestrator.session().stats.frames_processed;
        orchestrator.start().unwrap(); // no-op: stats must not reset
        assert!(orchestrator.session().stats.frames_processed >= frames_before);
        orchestrator.stop();
    }

    #[test]
    fn test_stop_preserves_stats_and_result() {
        let (source, _playing) = StubSource::playing();
        let mut orchestrator =
            DetectionOrchestrator::new(local(), None, BackendMode::Local, config());
        orchestrator.bind_source(source);
        orchestrator.start().unwrap();
        wait_for_frames(&orchestrator, 1);
        orchestrator.stop();

        let session = orchestrator.session();
        assert_eq!(session.state, SessionState::Idle);
        assert!(session.stats.frames_processed >= 1);
        assert!(session.last_result.is_some());
    }

    #[test]
    fn test_restart_resets_stats() {
        let (source, _playing) = StubSource::playing();
        let mut orchestrator =
            DetectionOrchestrator::new(local(), None, BackendMode::Local, config());
        orchestrator.bind_source(source);
        orchestrator.start().unwrap();
        wait_for_frames(&orchestrator, 2);
        orchestrator.stop();

        orchestrator.start().unwrap();
        // The first tick fires one interval after start, so the counters
        // must still read zero immediately after a fresh start
        let session = orchestrator.session();
        assert_eq!(session.stats.frames_processed, 0);
        assert!(session.last_result.is_none());
        orchestrator.stop();
    }

    // --- Ticking and stats ---

    #[test]
    fn test_local_mode_processes_frames() {
        let (source, _playing) = StubSource::playing();
        let mut orchestrator =
            DetectionOrchestrator::new(local(), None, BackendMode::Local, config());
        orchestrator.bind_source(source);
        orchestrator.start().unwrap();
        wait_for_frames(&orchestrator, 3);
        orchestrator.stop();

        let session = orchestrator.session();
        assert!(session.stats.frames_processed >= 3);
        assert!(session.stats.instantaneous_fps > 0);
        let result = session.last_result.unwrap();
        assert_eq!(result.source, EstimatorSource::Local);
        assert_eq!(result.landmarks[0].position.x, 1.0);
    }

    #[test]
    fn test_remote_mode_uses_remote_backend() {
        let (source, _playing) = StubSource::playing();
        let remote = MarkerEstimator::new(2.0, EstimatorSource::Remote);
        let mut orchestrator = DetectionOrchestrator::new(
            local(),
            Some(Box::new(remote)),
            BackendMode::Remote,
            config(),
        );
        orchestrator.bind_source(source);
        orchestrator.start().unwrap();
        wait_for_frames(&orchestrator, 1);
        orchestrator.stop();

        let result = orchestrator.session().last_result.unwrap();
        assert_eq!(result.source, EstimatorSource::Remote);
        assert_eq!(result.landmarks[0].position.x, 2.0);
    }

    #[test]
    fn test_failing_remote_falls_back_to_local_every_tick() {
        let (source, _playing) = StubSource::playing();
        let mut orchestrator = DetectionOrchestrator::new(
            local(),
            Some(Box::new(FailingRemote)),
            BackendMode::Remote,
            config(),
        );
        orchestrator.bind_source(source);
        orchestrator.start().unwrap();
        wait_for_frames(&orchestrator, 3);
        orchestrator.stop();

        let session = orchestrator.session();
        // Mode stays Remote; every result came from the local fallback
        assert_eq!(session.mode, BackendMode::Remote);
        assert!(session.stats.frames_processed >= 3);
        let result = session.last_result.unwrap();
        assert_eq!(result.source, EstimatorSource::Local);
    }

    #[test]
    fn test_paused_source_freezes_stats() {
        let (source, playing) = StubSource::playing();
        let mut orchestrator =
            DetectionOrchestrator::new(local(), None, BackendMode::Local, config());
        orchestrator.bind_source(source);
        orchestrator.start().unwrap();
        wait_for_frames(&orchestrator, 2);

        playing.store(false, Ordering::Relaxed);
        std::thread::sleep(TICK * 3);
        let frozen = orchestrator.session().stats.frames_processed;
        std::thread::sleep(TICK * 5);
        assert_eq!(orchestrator.session().stats.frames_processed, frozen);

        // Resume: counting picks back up with no error surfaced
        playing.store(true, Ordering::Relaxed);
        wait_for_frames(&orchestrator, frozen + 1);
        orchestrator.stop();
    }

    // --- Stale in-flight results ---

    #[test]
    fn test_stale_result_does_not_leak_into_next_session() {
        let (old_source, _p1) = StubSource::playing();
        let slow = MarkerEstimator::slow(
            777.0,
            EstimatorSource::Local,
            Duration::from_millis(120),
        );
        let mut orchestrator =
            DetectionOrchestrator::new(Box::new(slow), None, BackendMode::Local, config());
        orchestrator.bind_source(old_source);
        orchestrator.start().unwrap();
        // Let a tick begin its slow estimation call
        std::thread::sleep(TICK * 3);
        orchestrator.stop();

        // The in-flight call's result must have been discarded
        let session = orchestrator.session();
        assert_eq!(session.stats.frames_processed, 0);
        assert!(session.last_result.is_none());

        // New source, fresh session: the old call's result must not
        // surface here either (its epoch is long gone)
        let (new_source, _p2) = StubSource::playing();
        orchestrator.bind_source(new_source);
        orchestrator.start().unwrap();
        std::thread::sleep(TICK * 2);
        orchestrator.stop();
        let session = orchestrator.session();
        assert_eq!(session.stats.frames_processed, 0);
        assert!(session.last_result.is_none());
    }

    #[test]
    fn test_bind_source_stops_running_session() {
        let (source_a, _pa) = StubSource::playing();
        let (source_b, _pb) = StubSource::playing();
        let mut orchestrator =
            DetectionOrchestrator::new(local(), None, BackendMode::Local, config());
        orchestrator.bind_source(source_a);
        orchestrator.start().unwrap();
        wait_for_frames(&orchestrator, 1);

        orchestrator.bind_source(source_b);
        assert!(!orchestrator.is_running());
        assert_eq!(orchestrator.session().state, SessionState::Idle);

        orchestrator.start().unwrap();
        wait_for_frames(&orchestrator, 1);
        orchestrator.stop();
    }

    // --- Mode switching ---

    #[test]
    fn test_set_mode_switches_backend() {
        let (source, _playing) = StubSource::playing();
        let remote = MarkerEstimator::new(2.0, EstimatorSource::Remote);
        let mut orchestrator = DetectionOrchestrator::new(
            local(),
            Some(Box::new(remote)),
            BackendMode::Local,
            config(),
        );
        orchestrator.bind_source(source);
        orchestrator.start().unwrap();
        wait_for_frames(&orchestrator, 1);
        assert_eq!(
            orchestrator.session().last_result.unwrap().source,
            EstimatorSource::Local
        );

        orchestrator.set_mode(BackendMode::Remote);
        let before = orchestrator.session().stats.frames_processed;
        wait_for_frames(&orchestrator, before + 2);
        orchestrator.stop();
        assert_eq!(
            orchestrator.session().last_result.unwrap().source,
            EstimatorSource::Remote
        );
    }
}
