//! Task source trait abstraction.

use async_trait::async_trait;
use riskcast_core::Task;

/// Error type for task source operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur while loading tasks.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Status the upstream tracker query leaves out.
pub const CLOSED_STATUS: &str = "Closed";

/// Filter applied when loading tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFilter {
    /// Only tasks whose key belongs to this project
    pub project: Option<String>,

    /// Statuses to drop
    pub exclude_statuses: Vec<String>,
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self {
            project: None,
            exclude_statuses: vec![CLOSED_STATUS.to_string()],
        }
    }
}

impl TaskFilter {
    /// Filter that keeps every task.
    pub fn all() -> Self {
        Self {
            project: None,
            exclude_statuses: Vec::new(),
        }
    }

    /// Restrict to one project.
    pub fn for_project(project: impl Into<String>) -> Self {
        Self {
            project: Some(project.into()),
            ..Self::default()
        }
    }

    /// Whether a task passes the filter.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(project) = &self.project {
            if task.key.project_key() != project {
                return false;
            }
        }
        match &task.status {
            Some(status) => !self.exclude_statuses.iter().any(|s| s == status),
            None => true,
        }
    }
}

/// A supplier of tasks to simulate.
///
/// Implementations own retrieval and field mapping; the engine only ever sees
/// the resulting [`Task`] records.
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Load the tasks matching the filter, in source order.
    async fn load_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_drops_closed() {
        let filter = TaskFilter::default();
        assert!(filter.matches(&Task::new("P-1").with_status("Open")));
        assert!(filter.matches(&Task::new("P-2")));
        assert!(!filter.matches(&Task::new("P-3").with_status("Closed")));
    }

    #[test]
    fn test_project_filter() {
        let filter = TaskFilter::for_project("WEB");
        assert!(filter.matches(&Task::new("WEB-10")));
        assert!(!filter.matches(&Task::new("API-10")));
        assert!(!filter.matches(&Task::new("WEB-11").with_status("Closed")));
    }

    #[test]
    fn test_all_keeps_everything() {
        assert!(TaskFilter::all().matches(&Task::new("X-1").with_status("Closed")));
    }
}
