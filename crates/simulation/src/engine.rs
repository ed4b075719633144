//! The Monte Carlo engine - turns tasks into a schedule forecast.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use riskcast_core::{SimulationResult, Task, TaskAnalysis, TaskKey, UNKNOWN_PROJECT};
use tracing::{debug, info, warn};

use crate::assessment::overall_assessment;
use crate::risk::{completion_probability, RiskScorer};
use crate::run::SimulationRun;
use crate::sampler::TaskDistribution;
use crate::stats::{self, Summary};
use crate::{Result, SimulationConfig, SimulationError};

/// Maximum number of tasks reported on the critical path.
pub const CRITICAL_PATH_LEN: usize = 5;

/// Monte Carlo schedule engine.
///
/// One call to [`run`](Self::run) is one self-contained batch: sample, then
/// aggregate, then assemble a [`SimulationResult`]. Nothing is kept between
/// calls.
#[derive(Debug, Clone, Default)]
pub struct MonteCarloEngine {
    config: SimulationConfig,
    scorer: RiskScorer,
}

impl MonteCarloEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            scorer: RiskScorer::default(),
        }
    }

    /// Use a custom risk scorer.
    pub fn with_scorer(mut self, scorer: RiskScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulate `simulation_count` iterations over `tasks`.
    ///
    /// A non-positive count runs the default number of iterations. Fails when
    /// there is nothing to simulate or the run would not fit the sample budget.
    pub fn run(&self, tasks: &[Task], simulation_count: i64) -> Result<SimulationResult> {
        if tasks.is_empty() {
            return Err(SimulationError::InvalidInput("no tasks to simulate".to_string()));
        }

        let tasks = unique_tasks(tasks);
        let iterations = SimulationConfig::resolve_count(simulation_count);
        if SimulationConfig::sample_budget(iterations, tasks.len()).is_none() {
            return Err(SimulationError::InvalidInput(format!(
                "{} simulations over {} tasks exceeds the sample budget",
                simulation_count,
                tasks.len()
            )));
        }
        let seed = self.config.seed.unwrap_or_else(rand::random);

        info!(
            "Running {} simulations over {} tasks (seed {})",
            iterations,
            tasks.len(),
            seed
        );

        let run = SimulationRun::sample(&tasks, iterations, &self.config, seed);

        // Project-level distribution
        let project = Summary::of(run.totals());
        let sorted_totals = stats::sorted(run.totals());
        let p50 = stats::percentile(&sorted_totals, 50.0);
        let p80 = stats::percentile(&sorted_totals, 80.0);
        let p90 = stats::percentile(&sorted_totals, 90.0);

        // Per-task statistics, input order
        let task_summaries: Vec<(TaskKey, Summary)> = run
            .iter_tasks()
            .map(|(key, samples)| (key.clone(), Summary::of(samples)))
            .collect();

        let critical_path = critical_path(&task_summaries);
        debug!("Critical path: {:?}", critical_path);

        let mut task_completion_probabilities = BTreeMap::new();
        let mut task_analyses = BTreeMap::new();
        for (index, task) in tasks.iter().enumerate() {
            let samples = run.task_samples(index);
            let summary = &task_summaries[index].1;
            let analysis = self.analyze_task(task, samples, summary);
            task_completion_probabilities.insert(task.key.clone(), analysis.completion_probability);
            task_analyses.insert(task.key.clone(), analysis);
        }

        let task_correlations = self
            .config
            .compute_correlations
            .then(|| task_correlations(&run));

        let risk_analysis = self.scorer.analyze(&tasks, &project, p80, &task_summaries);
        let overall_assessment = overall_assessment(&project, &risk_analysis);

        let project_key = tasks
            .first()
            .map(|t| t.key.project_key().to_string())
            .unwrap_or_else(|| UNKNOWN_PROJECT.to_string());

        info!(
            "Simulation complete: p50={:.1}h p80={:.1}h p90={:.1}h, {} high-risk tasks",
            p50,
            p80,
            p90,
            risk_analysis.high_risk_tasks.len()
        );

        Ok(SimulationResult {
            project_key,
            total_simulations: iterations,
            seed,
            p50_duration: p50,
            p80_duration: p80,
            p90_duration: p90,
            mean_duration: project.mean,
            standard_deviation: project.std_dev,
            min_duration: project.min,
            max_duration: project.max,
            critical_path,
            task_completion_probabilities,
            task_analyses,
            duration_distribution: self.config.keep_distribution.then(|| run.totals().to_vec()),
            task_correlations,
            risk_analysis,
            overall_assessment,
        })
    }

    fn analyze_task(&self, task: &Task, samples: &[f64], summary: &Summary) -> TaskAnalysis {
        let dist = TaskDistribution::for_task(task);
        let completion = completion_probability(samples, dist.nominal);
        let variability = summary.coefficient_of_variation();

        TaskAnalysis {
            task_key: task.key.clone(),
            completion_probability: completion,
            estimated_duration: summary.mean,
            nominal_duration: dist.nominal,
            optimistic_duration: dist.optimistic,
            pessimistic_duration: dist.nominal * crate::sampler::PESSIMISTIC_FACTOR,
            risk_level: self.scorer.classify(completion, variability),
            variability,
            status: task.status.clone(),
            assignee: task.assignee.clone(),
            priority: task.priority.clone(),
        }
    }
}

/// Run a simulation with the default engine configuration.
pub fn run_simulation(tasks: &[Task], simulation_count: i64) -> Result<SimulationResult> {
    MonteCarloEngine::default().run(tasks, simulation_count)
}

/// Keep the first task for each key.
fn unique_tasks(tasks: &[Task]) -> Vec<Task> {
    let mut seen = HashSet::new();
    tasks
        .iter()
        .filter(|task| {
            let fresh = seen.insert(task.key.clone());
            if !fresh {
                warn!("Skipping duplicate task {}", task.key);
            }
            fresh
        })
        .cloned()
        .collect()
}

/// Longest mean durations first; equal means keep input order.
fn critical_path(task_summaries: &[(TaskKey, Summary)]) -> Vec<TaskKey> {
    let mut ranked: Vec<&(TaskKey, Summary)> = task_summaries.iter().collect();
    ranked.sort_by(|a, b| b.1.mean.partial_cmp(&a.1.mean).unwrap_or(Ordering::Equal));
    ranked
        .into_iter()
        .take(CRITICAL_PATH_LEN)
        .map(|(key, _)| key.clone())
        .collect()
}

fn task_correlations(run: &SimulationRun) -> BTreeMap<TaskKey, BTreeMap<TaskKey, f64>> {
    let keys = run.task_keys();
    let mut matrix: BTreeMap<TaskKey, BTreeMap<TaskKey, f64>> = keys
        .iter()
        .map(|key| (key.clone(), BTreeMap::new()))
        .collect();

    for i in 0..keys.len() {
        for j in i..keys.len() {
            let r = if i == j {
                1.0
            } else {
                stats::pearson(run.task_samples(i), run.task_samples(j))
            };
            if let Some(row) = matrix.get_mut(&keys[i]) {
                row.insert(keys[j].clone(), r);
            }
            if let Some(row) = matrix.get_mut(&keys[j]) {
                row.insert(keys[i].clone(), r);
            }
        }
    }

    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use riskcast_core::RiskLevel;

    fn seeded() -> MonteCarloEngine {
        MonteCarloEngine::new(SimulationConfig::new().with_seed(42))
    }

    fn project_tasks() -> Vec<Task> {
        vec![
            Task::new("PROJ-1").with_estimate_seconds(28_800).with_assignee("ana"),
            Task::new("PROJ-2").with_estimate_seconds(3_600 * 60).with_priority("High"),
            Task::new("PROJ-3").with_assignee("bo"),
            Task::new("PROJ-4").with_estimate_seconds(3_600 * 4).with_priority("Low").with_assignee("cy"),
            Task::new("PROJ-5").with_estimate_seconds(3_600 * 16).with_assignee("di"),
            Task::new("PROJ-6").with_estimate_seconds(3_600 * 2).with_assignee("ed"),
        ]
    }

    #[test]
    fn test_single_task_scenario() {
        let tasks = vec![Task::new("PROJ-123").with_estimate_seconds(28_800)];
        let result = seeded().run(&tasks, 1_000).unwrap();

        assert_eq!(result.project_key, "PROJ");
        assert_eq!(result.total_simulations, 1_000);
        // Median of Triangular(5.6, 8, 16) is 16 - sqrt(0.5 * 10.4 * 8) ~= 9.55
        let median = 16.0 - (0.5f64 * 10.4 * 8.0).sqrt();
        assert!((result.p50_duration - median).abs() < 0.5, "p50 {}", result.p50_duration);
        assert!(result.min_duration >= 5.6 - 1e-9 && result.max_duration <= 16.0);
        assert_eq!(result.risk_analysis.scope_risk, 0.0);
        assert_eq!(result.risk_analysis.resource_risk, 1.0);
        assert_eq!(result.critical_path, vec![TaskKey::from("PROJ-123")]);
    }

    #[test]
    fn test_resource_risk_with_one_unassigned() {
        let tasks = vec![
            Task::new("PROJ-1").with_estimate_seconds(7_200),
            Task::new("PROJ-2").with_estimate_seconds(7_200).with_assignee("kim"),
        ];
        let result = seeded().run(&tasks, 500).unwrap();
        assert_eq!(result.risk_analysis.resource_risk, 0.5);
    }

    #[test]
    fn test_missing_estimate_counts_toward_scope() {
        let tasks = vec![
            Task::new("PROJ-1"),
            Task::new("PROJ-2").with_estimate_seconds(7_200),
            Task::new("PROJ-3").with_estimate_seconds(7_200),
        ];
        let result = seeded().run(&tasks, 500).unwrap();
        assert!((result.risk_analysis.scope_risk - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(result.task_analyses[&TaskKey::from("PROJ-1")].nominal_duration, 8.0);
    }

    #[test]
    fn test_non_positive_count_uses_default() {
        let tasks = vec![Task::new("PROJ-1").with_estimate_seconds(3_600)];
        let engine = MonteCarloEngine::new(SimulationConfig::new().with_seed(1).with_correlations(false));
        let result = engine.run(&tasks, 0).unwrap();
        assert_eq!(result.total_simulations, crate::DEFAULT_SIMULATIONS);
        let result = engine.run(&tasks, -3).unwrap();
        assert_eq!(result.total_simulations, crate::DEFAULT_SIMULATIONS);
        assert_eq!(result.duration_distribution.map(|d| d.len()), Some(crate::DEFAULT_SIMULATIONS));
    }

    #[test]
    fn test_oversized_count_rejected() {
        let tasks = vec![Task::new("P-1").with_estimate_seconds(3_600)];
        let err = seeded().run(&tasks, i64::MAX).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidInput(_)));

        let wide: Vec<Task> = (0..8).map(|i| Task::new(format!("P-{i}"))).collect();
        let err = seeded().run(&wide, i32::MAX as i64).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidInput(_)));
    }

    #[test]
    fn test_empty_tasks_rejected() {
        let err = seeded().run(&[], 100).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidInput(_)));
    }

    #[test]
    fn test_percentiles_monotone_and_bounded() {
        let result = seeded().run(&project_tasks(), 2_000).unwrap();
        assert!(result.min_duration <= result.p50_duration);
        assert!(result.p50_duration <= result.p80_duration);
        assert!(result.p80_duration <= result.p90_duration);
        assert!(result.p90_duration <= result.max_duration);
        let risk = &result.risk_analysis;
        for score in [risk.schedule_risk, risk.resource_risk, risk.scope_risk] {
            assert!((0.0..=1.0).contains(&score));
        }
    }

    #[test]
    fn test_critical_path_ranks_by_mean() {
        let result = seeded().run(&project_tasks(), 2_000).unwrap();
        assert_eq!(result.critical_path.len(), CRITICAL_PATH_LEN);
        assert_eq!(result.critical_path[0], TaskKey::from("PROJ-2"));
        assert_eq!(result.critical_path[1], TaskKey::from("PROJ-5"));
        assert!(!result.critical_path.contains(&TaskKey::from("PROJ-6")));

        let means: Vec<f64> = result
            .critical_path
            .iter()
            .map(|k| result.task_analyses[k].estimated_duration)
            .collect();
        assert!(means.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_critical_path_ties_keep_input_order() {
        let summary = Summary { count: 1, mean: 8.0, std_dev: 0.0, min: 8.0, max: 8.0 };
        let summaries: Vec<(TaskKey, Summary)> = ["B-2", "A-1", "C-3"]
            .iter()
            .map(|k| (TaskKey::from(*k), summary))
            .collect();
        let path = critical_path(&summaries);
        assert_eq!(path, vec![TaskKey::from("B-2"), TaskKey::from("A-1"), TaskKey::from("C-3")]);
    }

    #[test]
    fn test_long_task_is_high_risk() {
        let result = seeded().run(&project_tasks(), 2_000).unwrap();
        let risk = &result.risk_analysis;
        assert!(risk.high_risk_tasks.contains(&TaskKey::from("PROJ-2")));
        assert!(!risk.high_risk_tasks.contains(&TaskKey::from("PROJ-1")));
        assert!(risk.recommendations.iter().any(|r| r.contains("high-risk task")));
    }

    #[test]
    fn test_completion_probability_matches_analysis() {
        let result = seeded().run(&project_tasks(), 2_000).unwrap();
        for (key, analysis) in &result.task_analyses {
            assert_eq!(result.task_completion_probabilities[key], analysis.completion_probability);
            assert!((0.0..=1.0).contains(&analysis.completion_probability));
        }
        // Triangular(0.7n, n, 2n): P(X <= n) = 0.3 / 1.3
        let p = result.task_completion_probabilities[&TaskKey::from("PROJ-1")];
        assert!((p - 0.3 / 1.3).abs() < 0.04, "p = {p}");
        assert_eq!(result.task_analyses[&TaskKey::from("PROJ-1")].risk_level, RiskLevel::High);
    }

    #[test]
    fn test_task_analysis_bounds() {
        let result = seeded().run(&project_tasks(), 200).unwrap();
        let a = &result.task_analyses[&TaskKey::from("PROJ-4")];
        assert_eq!(a.nominal_duration, 4.0);
        assert!((a.optimistic_duration - 2.8).abs() < 1e-12);
        assert_eq!(a.pessimistic_duration, 8.0);
        assert_eq!(a.assignee.as_deref(), Some("cy"));
    }

    #[test]
    fn test_dates_drive_nominal_duration() {
        let start = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
        let tasks = vec![Task::new("PROJ-1")
            .with_estimate_seconds(3_600)
            .with_dates(start, start + Duration::hours(24))];
        let result = seeded().run(&tasks, 500).unwrap();
        assert_eq!(result.task_analyses[&TaskKey::from("PROJ-1")].nominal_duration, 24.0);
        assert!(result.min_duration >= 0.7 * 24.0);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let a = seeded().run(&project_tasks(), 3_000).unwrap();
        let b = seeded().run(&project_tasks(), 3_000).unwrap();
        assert_eq!(a.seed, 42);
        assert_eq!(a.p80_duration, b.p80_duration);
        assert_eq!(a.task_analyses, b.task_analyses);
        assert_eq!(a.risk_analysis, b.risk_analysis);
        assert_eq!(a.overall_assessment, b.overall_assessment);
    }

    #[test]
    fn test_reported_seed_reproduces_run() {
        let first = MonteCarloEngine::default().run(&project_tasks(), 300).unwrap();
        let again = MonteCarloEngine::new(SimulationConfig::new().with_seed(first.seed))
            .run(&project_tasks(), 300)
            .unwrap();
        assert_eq!(first.duration_distribution, again.duration_distribution);
    }

    #[test]
    fn test_duplicate_keys_skipped() {
        let tasks = vec![
            Task::new("PROJ-1").with_estimate_seconds(3_600),
            Task::new("PROJ-1").with_estimate_seconds(3_600 * 100),
        ];
        let result = seeded().run(&tasks, 200).unwrap();
        assert_eq!(result.task_analyses.len(), 1);
        assert_eq!(result.task_analyses[&TaskKey::from("PROJ-1")].nominal_duration, 1.0);
    }

    #[test]
    fn test_correlation_matrix_shape() {
        let result = seeded().run(&project_tasks(), 1_000).unwrap();
        let matrix = result.task_correlations.unwrap();
        assert_eq!(matrix.len(), 6);
        for (key, row) in &matrix {
            assert_eq!(row.len(), 6);
            assert_eq!(row[key], 1.0);
            for (other, r) in row {
                assert_eq!(*r, matrix[other][key]);
                if other != key {
                    // independent draws
                    assert!(r.abs() < 0.15, "{key}/{other}: {r}");
                }
            }
        }
    }

    #[test]
    fn test_optional_outputs_can_be_disabled() {
        let engine = MonteCarloEngine::new(
            SimulationConfig::new()
                .with_seed(3)
                .with_distribution(false)
                .with_correlations(false),
        );
        let result = engine.run(&project_tasks(), 100).unwrap();
        assert!(result.duration_distribution.is_none());
        assert!(result.task_correlations.is_none());
    }

    #[test]
    fn test_free_function() {
        let tasks = vec![Task::new("ABC-9").with_estimate_seconds(3_600).with_assignee("x")];
        let result = run_simulation(&tasks, 100).unwrap();
        assert_eq!(result.project_key, "ABC");
        assert!(!result.overall_assessment.is_empty());
    }
}
