//! Detection session orchestration: lifecycle, periodic ticking, backend
//! selection with per-tick fallback, and throughput stats.

pub mod detection_session;
pub mod orchestrator;
pub mod stats;
