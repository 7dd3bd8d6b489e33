use std::path::{Path, PathBuf};
use std::process;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ab_glyph::FontVec;
use clap::Parser;

use lipmark_core::detection::domain::color_heuristic::{
    ColorHeuristicEstimator, SkinToneThresholds,
};
use lipmark_core::detection::domain::confidence_jitter::SeededJitter;
use lipmark_core::detection::domain::crop_planner::CropPlanner;
use lipmark_core::detection::domain::face_estimator::FaceEstimator;
use lipmark_core::detection::domain::landmark_synthesizer::LandmarkSynthesizer;
use lipmark_core::detection::infrastructure::local_estimator::LocalFaceEstimator;
use lipmark_core::detection::infrastructure::remote_estimator::RemoteFaceEstimator;
use lipmark_core::overlay::domain::overlay_renderer::OverlayRenderer;
use lipmark_core::overlay::infrastructure::raster_surface::RasterSurface;
use lipmark_core::session::detection_session::{BackendMode, DetectionSession};
use lipmark_core::session::orchestrator::{
    DetectionOrchestrator, OrchestratorConfig, SharedVideoSource,
};
use lipmark_core::shared::constants::DETECT_FACE_PATH;
use lipmark_core::video::domain::frame_sampler::FrameSampler;
use lipmark_core::video::infrastructure::image_sequence_source::ImageSequenceSource;

/// Mouth region localization over a playing image sequence.
#[derive(Parser)]
#[command(name = "lipmark")]
struct Cli {
    /// Input image file or directory of frames (sorted by name).
    input: PathBuf,

    /// Detection backend: local or remote.
    #[arg(long, default_value = "local")]
    mode: String,

    /// Remote detection endpoint (used with --mode remote).
    #[arg(long)]
    endpoint: Option<String>,

    /// Sampling stride for the skin-tone scan, in pixels.
    #[arg(long, default_value = "10")]
    stride: usize,

    /// Playback rate of the input sequence.
    #[arg(long, default_value = "30.0")]
    fps: f64,

    /// Detection interval in milliseconds.
    #[arg(long, default_value = "100")]
    interval_ms: u64,

    /// Number of detection intervals to run before exiting.
    #[arg(long, default_value = "30")]
    ticks: u64,

    /// Seed for deterministic landmark confidence jitter.
    #[arg(long)]
    seed: Option<u64>,

    /// Save an overlay of the final result to this PNG file.
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// TTF/OTF font for the crop region label (label is skipped without it).
    #[arg(long)]
    font: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let mode = parse_mode(&cli.mode);
    let local = build_local_estimator(cli.stride, cli.seed);
    let remote: Option<Box<dyn FaceEstimator>> = match mode {
        BackendMode::Remote => {
            let endpoint = cli
                .endpoint
                .clone()
                .unwrap_or_else(|| format!("http://127.0.0.1:5000{DETECT_FACE_PATH}"));
            Some(Box::new(RemoteFaceEstimator::new(
                endpoint,
                cli.input.display().to_string(),
            )))
        }
        BackendMode::Local => None,
    };

    let mut sequence = ImageSequenceSource::open(&cli.input, cli.fps)?;
    sequence.play();
    let source: SharedVideoSource = Arc::new(Mutex::new(sequence));

    let config = OrchestratorConfig {
        tick_interval: Duration::from_millis(cli.interval_ms),
        ..OrchestratorConfig::default()
    };
    let mut orchestrator = DetectionOrchestrator::new(local, remote, mode, config);
    orchestrator.bind_source(source.clone());

    log::info!(
        "Running {} ticks at {}ms over {}",
        cli.ticks,
        cli.interval_ms,
        cli.input.display()
    );
    orchestrator.start()?;
    std::thread::sleep(Duration::from_millis(cli.interval_ms * cli.ticks));
    orchestrator.stop();

    let session = orchestrator.session();
    log::info!(
        "Processed {} frames, last latency {:.1}ms ({} fps)",
        session.stats.frames_processed,
        session.stats.last_latency_ms,
        session.stats.instantaneous_fps
    );
    if let Some(result) = &session.last_result {
        log::info!(
            "Last result: {} landmarks, crop {:?} (source {:?})",
            result.landmarks.len(),
            result.crop(),
            result.source
        );
    }

    if let Some(overlay_path) = &cli.overlay {
        write_overlay(&session, &source, cli.font.as_deref(), overlay_path)?;
        log::info!("Overlay written to {}", overlay_path.display());
    }

    Ok(())
}

fn build_local_estimator(stride: usize, seed: Option<u64>) -> Box<dyn FaceEstimator> {
    let jitter = match seed {
        Some(seed) => SeededJitter::from_seed(seed),
        None => SeededJitter::default(),
    };
    Box::new(LocalFaceEstimator::new(
        ColorHeuristicEstimator::new(stride, SkinToneThresholds::default()),
        LandmarkSynthesizer::new(Box::new(jitter)),
        CropPlanner::default(),
    ))
}

fn write_overlay(
    session: &DetectionSession,
    source: &SharedVideoSource,
    font: Option<&Path>,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut surface = match font {
        Some(font_path) => RasterSurface::with_font(load_font(font_path)?),
        None => RasterSurface::new(),
    };

    let frame = {
        let mut guard = source.lock().map_err(|_| "video source lock poisoned")?;
        FrameSampler::default().capture(&mut *guard)?
    };

    OverlayRenderer::new().render(&mut surface, &frame, session.last_result.as_ref());
    surface.save(path)?;
    Ok(())
}

fn load_font(path: &Path) -> Result<FontVec, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)?;
    FontVec::try_from_vec(bytes).map_err(|e| format!("invalid font {}: {e}", path.display()).into())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input not found: {}", cli.input.display()).into());
    }
    if cli.mode != "local" && cli.mode != "remote" {
        return Err(format!("Mode must be 'local' or 'remote', got '{}'", cli.mode).into());
    }
    if cli.stride == 0 {
        return Err("Stride must be at least 1".into());
    }
    if cli.fps <= 0.0 {
        return Err(format!("fps must be positive, got {}", cli.fps).into());
    }
    if cli.interval_ms == 0 {
        return Err("Interval must be at least 1ms".into());
    }
    if cli.ticks == 0 {
        return Err("Ticks must be at least 1".into());
    }
    Ok(())
}

fn parse_mode(mode: &str) -> BackendMode {
    if mode == "remote" {
        BackendMode::Remote
    } else {
        BackendMode::Local
    }
}
