use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of per-landmark confidence jitter.
///
/// Injectable so tests can pin exact confidence values; production uses
/// [`SeededJitter`].
pub trait ConfidenceJitter: Send {
    /// A sample in `[0, 1)`. The synthesizer scales it by the
    /// category-specific spread.
    fn sample(&mut self) -> f64;
}

/// Deterministic-when-seeded jitter over a [`StdRng`].
pub struct SeededJitter {
    rng: StdRng,
}

impl SeededJitter {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SeededJitter {
    fn default() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl ConfidenceJitter for SeededJitter {
    fn sample(&mut self) -> f64 {
        self.rng.random()
    }
}
