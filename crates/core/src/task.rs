//! Task model - the unit of work whose duration is simulated.

use serde::{Deserialize, Serialize};
use crate::id::TaskKey;
use crate::Time;

/// Duration assumed for a task that carries neither an estimate nor a usable
/// date range.
pub const DEFAULT_TASK_HOURS: f64 = 8.0;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// A task as supplied by a task source.
///
/// Only `key` is required. Everything else is optional because tracker data
/// is routinely incomplete; missing fields feed the risk scores instead of
/// failing the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Tracker key, e.g. `PROJ-123`
    pub key: TaskKey,

    /// One-line summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Issue type (Story, Bug, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,

    /// Workflow status, carried through to the analysis
    #[serde(default)]
    pub status: Option<String>,

    /// Assignee; `None` counts as unassigned
    #[serde(default)]
    pub assignee: Option<String>,

    /// Priority
    #[serde(default)]
    pub priority: Option<Priority>,

    /// Original estimate in seconds
    #[serde(default)]
    pub original_estimate_seconds: Option<u64>,

    /// Time already logged, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent_seconds: Option<u64>,

    /// Remaining estimate, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_estimate_seconds: Option<u64>,

    /// Planned start
    #[serde(default, deserialize_with = "crate::timestamp::lenient")]
    pub start_date: Option<Time>,

    /// Planned finish
    #[serde(default, deserialize_with = "crate::timestamp::lenient")]
    pub finish_date: Option<Time>,
}

impl Task {
    /// Create a task with only a key.
    pub fn new(key: impl Into<TaskKey>) -> Self {
        Self {
            key: key.into(),
            summary: None,
            issue_type: None,
            status: None,
            assignee: None,
            priority: None,
            original_estimate_seconds: None,
            time_spent_seconds: None,
            remaining_estimate_seconds: None,
            start_date: None,
            finish_date: None,
        }
    }

    /// Set the original estimate in seconds.
    pub fn with_estimate_seconds(mut self, seconds: u64) -> Self {
        self.original_estimate_seconds = Some(seconds);
        self
    }

    /// Set the assignee.
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: impl Into<Priority>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Set the planned date range.
    pub fn with_dates(mut self, start: Time, finish: Time) -> Self {
        self.start_date = Some(start);
        self.finish_date = Some(finish);
        self
    }

    /// Whether the task has an original estimate.
    pub fn has_estimate(&self) -> bool {
        self.original_estimate_seconds.is_some()
    }

    /// Whether the task is assigned to someone.
    pub fn is_assigned(&self) -> bool {
        self.assignee.is_some()
    }

    /// Hours between the planned start and finish.
    ///
    /// Only defined when both dates are present and finish is strictly after
    /// start. Partial hours are dropped and the result is never below one hour.
    pub fn planned_hours(&self) -> Option<f64> {
        let (start, finish) = (self.start_date?, self.finish_date?);
        if finish <= start {
            return None;
        }
        let hours = (finish - start).num_hours() as f64;
        Some(hours.max(1.0))
    }

    /// The un-randomized duration of this task in hours.
    ///
    /// A valid planned date range wins over the estimate; with neither, the
    /// task is assumed to take [`DEFAULT_TASK_HOURS`].
    pub fn nominal_hours(&self) -> f64 {
        if let Some(hours) = self.planned_hours() {
            return hours;
        }
        self.original_estimate_seconds
            .map(|secs| secs as f64 / SECONDS_PER_HOUR)
            .unwrap_or(DEFAULT_TASK_HOURS)
    }
}

/// Task priority.
///
/// Trackers use an open set of names; only `High` and `Low` change how a
/// task's duration is sampled. Anything else is kept verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    /// Widens the pessimistic tail
    High,
    /// Narrows the pessimistic tail
    Low,
    /// Any other tracker priority
    Other(String),
}

impl Priority {
    /// The tracker's name for this priority.
    pub fn as_str(&self) -> &str {
        match self {
            Priority::High => "High",
            Priority::Low => "Low",
            Priority::Other(name) => name,
        }
    }
}

impl From<String> for Priority {
    fn from(name: String) -> Self {
        match name.as_str() {
            "High" => Priority::High,
            "Low" => Priority::Low,
            _ => Priority::Other(name),
        }
    }
}

impl From<&str> for Priority {
    fn from(name: &str) -> Self {
        Priority::from(name.to_string())
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
