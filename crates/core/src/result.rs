//! Simulation output records.
//!
//! A [`SimulationResult`] is assembled once, after every statistic has been
//! computed, and is never modified by the engine afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use crate::id::TaskKey;
use crate::task::Priority;

/// Outcome of one Monte Carlo run over a project's tasks.
///
/// All durations are in hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Project prefix of the first task key
    pub project_key: String,

    /// Number of simulated iterations
    pub total_simulations: usize,

    /// Root seed of the random streams; re-running with it reproduces the result
    pub seed: u64,

    /// Median project duration
    pub p50_duration: f64,

    /// 80th percentile project duration
    pub p80_duration: f64,

    /// 90th percentile project duration
    pub p90_duration: f64,

    /// Mean project duration
    pub mean_duration: f64,

    /// Sample standard deviation of the project duration
    pub standard_deviation: f64,

    /// Shortest simulated project duration
    pub min_duration: f64,

    /// Longest simulated project duration
    pub max_duration: f64,

    /// Up to five tasks with the longest mean simulated duration, longest first
    pub critical_path: Vec<TaskKey>,

    /// Probability that each task finishes within its nominal duration
    pub task_completion_probabilities: BTreeMap<TaskKey, f64>,

    /// Per-task statistics and risk classification
    pub task_analyses: BTreeMap<TaskKey, TaskAnalysis>,

    /// Every simulated project duration, in iteration order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_distribution: Option<Vec<f64>>,

    /// Pearson correlation between the sampled durations of each task pair
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_correlations: Option<BTreeMap<TaskKey, BTreeMap<TaskKey, f64>>>,

    /// Aggregate risk scores and recommendations
    pub risk_analysis: RiskAnalysis,

    /// Natural-language summary
    pub overall_assessment: String,
}

/// Derived statistics for a single task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAnalysis {
    /// Task this analysis belongs to
    pub task_key: TaskKey,

    /// Fraction of samples at or below the nominal duration
    pub completion_probability: f64,

    /// Mean sampled duration
    pub estimated_duration: f64,

    /// Un-randomized duration derived from dates or estimate
    pub nominal_duration: f64,

    /// Optimistic bound (70% of nominal)
    pub optimistic_duration: f64,

    /// Pessimistic bound before priority adjustment (200% of nominal)
    pub pessimistic_duration: f64,

    /// Risk classification
    pub risk_level: RiskLevel,

    /// Coefficient of variation of the samples
    pub variability: f64,

    /// Tracker status
    pub status: Option<String>,

    /// Assignee
    pub assignee: Option<String>,

    /// Priority
    pub priority: Option<Priority>,
}

/// Per-task risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Likely on time and stable
    Low,
    /// Some slippage or spread
    Medium,
    /// Unlikely on time or highly variable
    High,
}

impl RiskLevel {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project-level risk assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnalysis {
    /// Relative gap between p80 and mean, in [0, 1]
    pub schedule_risk: f64,

    /// Share of unassigned tasks, in [0, 1]
    pub resource_risk: f64,

    /// Share of tasks without an estimate, in [0, 1]
    pub scope_risk: f64,

    /// Tasks with highly variable or very long simulated durations
    pub high_risk_tasks: Vec<TaskKey>,

    /// Ordered advice derived from the scores
    pub recommendations: Vec<String>,
}

impl RiskAnalysis {
    /// Mean of the three aggregate scores.
    pub fn combined_risk(&self) -> f64 {
        (self.schedule_risk + self.resource_risk + self.scope_risk) / 3.0
    }
}
