//! The sampling loop.
//!
//! Iterations are cut into fixed-size blocks. Each block draws from its own
//! ChaCha stream (root seed + block index as stream number), so blocks can be
//! sampled on any thread in any order and still concatenate to the same run.

use rand::distributions::Distribution;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use riskcast_core::{Task, TaskKey};
use tracing::debug;

use crate::sampler::{TaskDistribution, Triangular};
use crate::SimulationConfig;

/// Raw samples of one simulation run, held in memory only.
///
/// `task_samples(t)[i]` is task `t`'s duration in iteration `i`, and
/// `totals()[i]` is the sum of every task's duration in iteration `i`.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    task_keys: Vec<TaskKey>,
    samples: Vec<Vec<f64>>,
    totals: Vec<f64>,
}

/// Samples produced by one random stream.
struct Block {
    samples: Vec<Vec<f64>>,
    totals: Vec<f64>,
}

impl SimulationRun {
    /// Sample `iterations` durations for every task.
    pub fn sample(tasks: &[Task], iterations: usize, config: &SimulationConfig, seed: u64) -> Self {
        let distributions: Vec<Triangular> = tasks
            .iter()
            .map(|t| TaskDistribution::for_task(t).triangular())
            .collect();

        let block_size = config.block_size.get();
        let ranges: Vec<(u64, usize)> = (0..iterations)
            .step_by(block_size)
            .enumerate()
            .map(|(index, start)| (index as u64, block_size.min(iterations - start)))
            .collect();

        debug!(
            "Sampling {} iterations x {} tasks in {} blocks",
            iterations,
            tasks.len(),
            ranges.len()
        );

        let blocks: Vec<Block> = if config.parallel {
            ranges
                .into_par_iter()
                .map(|(stream, len)| sample_block(&distributions, seed, stream, len))
                .collect()
        } else {
            ranges
                .into_iter()
                .map(|(stream, len)| sample_block(&distributions, seed, stream, len))
                .collect()
        };

        let mut samples: Vec<Vec<f64>> = (0..tasks.len()).map(|_| Vec::with_capacity(iterations)).collect();
        let mut totals = Vec::with_capacity(iterations);
        for block in blocks {
            for (dest, part) in samples.iter_mut().zip(block.samples) {
                dest.extend(part);
            }
            totals.extend(block.totals);
        }

        Self {
            task_keys: tasks.iter().map(|t| t.key.clone()).collect(),
            samples,
            totals,
        }
    }

    /// Number of iterations.
    pub fn iterations(&self) -> usize {
        self.totals.len()
    }

    /// Task keys in input order.
    pub fn task_keys(&self) -> &[TaskKey] {
        &self.task_keys
    }

    /// Samples of the task at `index` (input order).
    pub fn task_samples(&self, index: usize) -> &[f64] {
        &self.samples[index]
    }

    /// Iterate `(key, samples)` in input order.
    pub fn iter_tasks(&self) -> impl Iterator<Item = (&TaskKey, &[f64])> {
        self.task_keys.iter().zip(self.samples.iter().map(Vec::as_slice))
    }

    /// Per-iteration project totals.
    pub fn totals(&self) -> &[f64] {
        &self.totals
    }
}

fn sample_block(distributions: &[Triangular], seed: u64, stream: u64, len: usize) -> Block {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);

    let mut samples: Vec<Vec<f64>> = (0..distributions.len()).map(|_| Vec::with_capacity(len)).collect();
    let mut totals = Vec::with_capacity(len);

    for _ in 0..len {
        let mut total = 0.0;
        for (dist, out) in distributions.iter().zip(samples.iter_mut()) {
            let duration = dist.sample(&mut rng);
            out.push(duration);
            total += duration;
        }
        totals.push(total);
    }

    Block { samples, totals }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    fn tasks() -> Vec<Task> {
        vec![
            Task::new("PROJ-1").with_estimate_seconds(28_800),
            Task::new("PROJ-2").with_estimate_seconds(7_200).with_priority("High"),
            Task::new("PROJ-3").with_priority("Low"),
        ]
    }

    fn small_blocks() -> SimulationConfig {
        SimulationConfig::new().with_block_size(NonZeroUsize::new(64).unwrap())
    }

    #[test]
    fn test_lengths_match_iterations() {
        let run = SimulationRun::sample(&tasks(), 1_000, &small_blocks(), 1);
        assert_eq!(run.iterations(), 1_000);
        assert_eq!(run.totals().len(), 1_000);
        for (_, samples) in run.iter_tasks() {
            assert_eq!(samples.len(), 1_000);
        }
    }

    #[test]
    fn test_totals_are_row_sums() {
        let run = SimulationRun::sample(&tasks(), 777, &small_blocks(), 2);
        for i in 0..run.iterations() {
            let mut sum = 0.0;
            for t in 0..run.task_keys().len() {
                sum += run.task_samples(t)[i];
            }
            assert_eq!(run.totals()[i], sum);
        }
    }

    #[test]
    fn test_samples_within_bounds() {
        let tasks = tasks();
        let run = SimulationRun::sample(&tasks, 2_000, &small_blocks(), 3);
        for (t, task) in tasks.iter().enumerate() {
            let dist = TaskDistribution::for_task(task);
            assert!(run
                .task_samples(t)
                .iter()
                .all(|&x| x >= dist.optimistic && x <= dist.pessimistic));
        }
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let par = SimulationRun::sample(&tasks(), 500, &small_blocks(), 99);
        let seq = SimulationRun::sample(&tasks(), 500, &small_blocks().with_parallel(false), 99);
        assert_eq!(par.totals(), seq.totals());
        assert_eq!(par.task_samples(1), seq.task_samples(1));
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = SimulationRun::sample(&tasks(), 100, &small_blocks(), 1);
        let b = SimulationRun::sample(&tasks(), 100, &small_blocks(), 2);
        assert_ne!(a.totals(), b.totals());
    }

    #[test]
    fn test_blocks_use_distinct_streams() {
        let run = SimulationRun::sample(&tasks(), 128, &small_blocks(), 5);
        assert_ne!(&run.totals()[..64], &run.totals()[64..]);
    }

    #[test]
    fn test_task_buffers_hold_full_run() {
        let run = SimulationRun::sample(&tasks(), 300, &small_blocks(), 4);
        for t in 0..run.task_keys().len() {
            assert_eq!(run.task_samples(t).len(), 300);
            assert!(run.samples[t].capacity() >= 300);
        }
    }

    #[test]
    fn test_keys_in_input_order() {
        let run = SimulationRun::sample(&tasks(), 10, &SimulationConfig::default(), 0);
        let keys: Vec<&str> = run.task_keys().iter().map(TaskKey::as_str).collect();
        assert_eq!(keys, vec!["PROJ-1", "PROJ-2", "PROJ-3"]);
    }
}
