//! Random sampling seam
//!
//! All probabilistic decisions (eligibility roll, weighted selection,
//! delay) draw through this trait so they stay deterministic under test.
//! The default implementation uses the thread-local generator; draws are
//! independent per request and carry no cross-request ordering guarantee.

use rand::Rng;

/// Source of uniform random draws for chaos decisions
pub trait Sampler: Send + Sync {
    /// Uniform draw in `[0, 100)`, compared against percent thresholds
    fn roll_percent(&self) -> f64;

    /// Uniform draw in `[0, 1)`, used for weighted selection
    fn unit(&self) -> f64;

    /// Uniform integer draw in `[min, max)` milliseconds
    ///
    /// Returns `min` when the range is empty.
    fn duration_ms(&self, min: u64, max: u64) -> u64;
}

/// Thread-local RNG backed sampler (the production default)
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSampler;

impl Sampler for ThreadRngSampler {
    fn roll_percent(&self) -> f64 {
        rand::rng().random_range(0.0..100.0)
    }

    fn unit(&self) -> f64 {
        rand::rng().random::<f64>()
    }

    fn duration_ms(&self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        rand::rng().random_range(min..max)
    }
}
