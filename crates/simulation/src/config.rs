//! Simulation configuration.

use std::num::NonZeroUsize;

/// Iterations used when the caller asks for a non-positive count.
pub const DEFAULT_SIMULATIONS: usize = 10_000;

/// Largest iteration count accepted per run.
pub const MAX_SIMULATIONS: usize = i32::MAX as usize;

/// Largest number of task samples (iterations x tasks) held by one run.
pub const MAX_SAMPLES: usize = 1 << 28;

const DEFAULT_BLOCK_SIZE: usize = 1024;

/// Configuration for the Monte Carlo engine.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Root seed for the random streams (None = fresh entropy per run)
    pub seed: Option<u64>,
    /// Iterations sampled per random stream
    pub block_size: NonZeroUsize,
    /// Sample blocks on the rayon pool instead of the calling thread
    pub parallel: bool,
    /// Keep every project total in the result
    pub keep_distribution: bool,
    /// Compute pairwise task correlations
    pub compute_correlations: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            block_size: NonZeroUsize::new(DEFAULT_BLOCK_SIZE).unwrap_or(NonZeroUsize::MIN),
            parallel: true,
            keep_distribution: true,
            compute_correlations: true,
        }
    }
}

impl SimulationConfig {
    /// Create a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the root seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set iterations per random stream.
    pub fn with_block_size(mut self, block_size: NonZeroUsize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Enable or disable parallel sampling.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Keep or drop the raw project duration distribution.
    pub fn with_distribution(mut self, keep: bool) -> Self {
        self.keep_distribution = keep;
        self
    }

    /// Enable or disable task correlations.
    pub fn with_correlations(mut self, compute: bool) -> Self {
        self.compute_correlations = compute;
        self
    }

    /// Resolve a caller-supplied iteration count.
    ///
    /// Zero and negative counts fall back to [`DEFAULT_SIMULATIONS`].
    pub fn resolve_count(requested: i64) -> usize {
        if requested <= 0 {
            DEFAULT_SIMULATIONS
        } else {
            usize::try_from(requested).unwrap_or(usize::MAX)
        }
    }

    /// Total samples a run of `iterations` over `task_count` tasks would hold.
    ///
    /// `None` when the iteration count or the sample total is over budget.
    pub fn sample_budget(iterations: usize, task_count: usize) -> Option<usize> {
        if iterations > MAX_SIMULATIONS {
            return None;
        }
        iterations
            .checked_mul(task_count)
            .filter(|&samples| samples <= MAX_SAMPLES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_count() {
        assert_eq!(SimulationConfig::resolve_count(0), DEFAULT_SIMULATIONS);
        assert_eq!(SimulationConfig::resolve_count(-5), DEFAULT_SIMULATIONS);
        assert_eq!(SimulationConfig::resolve_count(250), 250);
    }

    #[test]
    fn test_sample_budget() {
        assert_eq!(SimulationConfig::sample_budget(10_000, 50), Some(500_000));
        assert_eq!(SimulationConfig::sample_budget(MAX_SIMULATIONS + 1, 1), None);
        assert_eq!(SimulationConfig::sample_budget(MAX_SAMPLES, 2), None);
        assert_eq!(SimulationConfig::sample_budget(usize::MAX, 2), None);
        assert_eq!(SimulationConfig::sample_budget(MAX_SAMPLES / 4, 4), Some(MAX_SAMPLES));
    }

    #[test]
    fn test_builder() {
        let config = SimulationConfig::new()
            .with_seed(7)
            .with_parallel(false)
            .with_correlations(false);
        assert_eq!(config.seed, Some(7));
        assert!(!config.parallel);
        assert!(!config.compute_correlations);
        assert!(config.keep_distribution);
        assert_eq!(config.block_size.get(), 1024);
    }
}
