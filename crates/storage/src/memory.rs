//! In-memory task source.

use async_trait::async_trait;
use riskcast_core::Task;

use super::{Result, TaskFilter, TaskSource};

/// Serves a fixed list of tasks.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskSource {
    tasks: Vec<Task>,
}

impl MemoryTaskSource {
    /// Wrap a task list.
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Append a task.
    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }
}

#[async_trait]
impl TaskSource for MemoryTaskSource {
    async fn load_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        Ok(self
            .tasks
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }
}
