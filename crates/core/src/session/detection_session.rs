use crate::shared::detection_result::DetectionResult;

use super::stats::ProcessingStats;

/// Which estimation strategy the orchestrator prefers each tick.
///
/// `Remote` still falls back to the local pipeline per tick on failure;
/// the mode itself is not changed by a single failed call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendMode {
    Remote,
    Local,
}

/// Orchestrator lifecycle: `Idle -> Running -> Idle`. There are no other
/// states; `stop` always returns to `Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
}

/// Live orchestration state for one detection session.
///
/// Owned and mutated exclusively by the orchestrator; callers observe it
/// through cloned snapshots. After `stop`, `stats` and `last_result`
/// remain visible for inspection until the next `start`.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionSession {
    pub mode: BackendMode,
    pub state: SessionState,
    pub stats: ProcessingStats,
    pub last_result: Option<DetectionResult>,
}

impl DetectionSession {
    pub fn new(mode: BackendMode) -> Self {
        Self {
            mode,
            state: SessionState::Idle,
            stats: ProcessingStats::default(),
            last_result: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }
}
