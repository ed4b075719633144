//! Risk classification and recommendations.

use riskcast_core::{RiskAnalysis, RiskLevel, Task, TaskKey};

use crate::stats::Summary;

/// Thresholds used to classify tasks and trigger recommendations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    /// Minimum completion probability for a Low risk task
    pub low_min_completion: f64,
    /// Variability ceiling for a Low risk task
    pub low_max_variability: f64,
    /// Minimum completion probability for a Medium risk task
    pub medium_min_completion: f64,
    /// Variability ceiling for a Medium risk task
    pub medium_max_variability: f64,
    /// Variability above which a task is flagged high risk
    pub high_risk_variability: f64,
    /// Mean duration (hours) above which a task is flagged high risk
    pub high_risk_mean_hours: f64,
    /// Schedule risk that triggers buffer advice
    pub schedule_alert: f64,
    /// Resource risk that triggers assignment advice
    pub resource_alert: f64,
    /// Scope risk that triggers estimation advice
    pub scope_alert: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low_min_completion: 0.8,
            low_max_variability: 0.3,
            medium_min_completion: 0.6,
            medium_max_variability: 0.5,
            high_risk_variability: 0.5,
            high_risk_mean_hours: 40.0,
            schedule_alert: 0.3,
            resource_alert: 0.2,
            scope_alert: 0.1,
        }
    }
}

/// Scores schedule, resource and scope risk.
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    thresholds: RiskThresholds,
}

impl RiskScorer {
    /// Create a scorer with custom thresholds.
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    /// Active thresholds.
    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// Classify a task from its completion probability and variability.
    pub fn classify(&self, completion_probability: f64, variability: f64) -> RiskLevel {
        let t = &self.thresholds;
        if completion_probability >= t.low_min_completion && variability < t.low_max_variability {
            RiskLevel::Low
        } else if completion_probability >= t.medium_min_completion
            && variability < t.medium_max_variability
        {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    /// Whether a task's samples make it high risk.
    pub fn is_high_risk(&self, summary: &Summary) -> bool {
        summary.coefficient_of_variation() > self.thresholds.high_risk_variability
            || summary.mean > self.thresholds.high_risk_mean_hours
    }

    /// Relative gap between p80 and the mean project duration, in [0, 1].
    pub fn schedule_risk(&self, mean: f64, p80: f64) -> f64 {
        if mean == 0.0 || !mean.is_finite() {
            return 0.0;
        }
        clamp_unit((p80 - mean) / mean)
    }

    /// Share of tasks without an assignee.
    pub fn resource_risk(&self, tasks: &[Task]) -> f64 {
        share(tasks, |t| !t.is_assigned())
    }

    /// Share of tasks without an original estimate.
    pub fn scope_risk(&self, tasks: &[Task]) -> f64 {
        share(tasks, |t| !t.has_estimate())
    }

    /// Ordered advice for the given scores.
    pub fn recommendations(
        &self,
        schedule_risk: f64,
        resource_risk: f64,
        scope_risk: f64,
        high_risk_count: usize,
    ) -> Vec<String> {
        let t = &self.thresholds;
        let mut advice = Vec::new();

        if schedule_risk > t.schedule_alert {
            advice.push(
                "Schedule risk is high. Add buffer time or run independent work in parallel."
                    .to_string(),
            );
        }
        if resource_risk > t.resource_alert {
            advice.push(
                "Many tasks are unassigned. Assign owners before committing to a date."
                    .to_string(),
            );
        }
        if scope_risk > t.scope_alert {
            advice.push(
                "Some tasks have no estimate. Complete time estimates for every task.".to_string(),
            );
        }
        if high_risk_count > 0 {
            advice.push(format!(
                "{} high-risk task(s) need a detailed review.",
                high_risk_count
            ));
        }
        if advice.is_empty() {
            advice.push("The project is in good shape. Keep monitoring it regularly.".to_string());
        }

        advice
    }

    /// Build the aggregate risk analysis.
    ///
    /// `task_summaries` pairs each task key with the summary of its samples,
    /// in input order; flagged tasks keep that order.
    pub fn analyze(
        &self,
        tasks: &[Task],
        project: &Summary,
        p80: f64,
        task_summaries: &[(TaskKey, Summary)],
    ) -> RiskAnalysis {
        let schedule_risk = self.schedule_risk(project.mean, p80);
        let resource_risk = self.resource_risk(tasks);
        let scope_risk = self.scope_risk(tasks);

        let high_risk_tasks: Vec<TaskKey> = task_summaries
            .iter()
            .filter(|(_, summary)| self.is_high_risk(summary))
            .map(|(key, _)| key.clone())
            .collect();

        let recommendations =
            self.recommendations(schedule_risk, resource_risk, scope_risk, high_risk_tasks.len());

        RiskAnalysis {
            schedule_risk,
            resource_risk,
            scope_risk,
            high_risk_tasks,
            recommendations,
        }
    }
}

/// Fraction of samples at or below `nominal`.
pub fn completion_probability(samples: &[f64], nominal: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let on_time = samples.iter().filter(|&&x| x <= nominal).count();
    on_time as f64 / samples.len() as f64
}

fn share(tasks: &[Task], pred: impl Fn(&Task) -> bool) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let hits = tasks.iter().filter(|t| pred(t)).count();
    clamp_unit(hits as f64 / tasks.len() as f64)
}

fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    x.clamp(0.0, 1.0)
}
