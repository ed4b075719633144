//! JSON file task source.
//!
//! Reads a file holding either a bare array of task objects or an object with
//! a `tasks` array. Records that fail to decode are skipped, so one bad export
//! row never blocks a forecast.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use riskcast_core::{MalformedTaskError, Task};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, info, warn};

use super::{Result, StorageError, TaskFilter, TaskSource};

/// File-based JSON task source.
pub struct JsonTaskSource {
    path: PathBuf,
}

impl JsonTaskSource {
    /// Create a source reading from `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// File this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode task records from a JSON document.
    pub fn parse(content: &str) -> Result<Vec<Task>> {
        let root: Value = serde_json::from_str(content)?;
        let records = match root {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("tasks") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(StorageError::Other(
                        "expected a `tasks` array".to_string(),
                    ))
                }
            },
            _ => {
                return Err(StorageError::Other(
                    "expected an array of tasks".to_string(),
                ))
            }
        };

        let mut tasks = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<Task>(record) {
                Ok(task) => tasks.push(task),
                Err(e) => {
                    let err = MalformedTaskError::Record(e.to_string());
                    warn!("Skipping task record #{}: {}", index, err);
                }
            }
        }

        Ok(tasks)
    }
}

#[async_trait]
impl TaskSource for JsonTaskSource {
    async fn load_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        debug!("Reading tasks from {}", self.path.display());
        let content = fs::read_to_string(&self.path).await?;

        let tasks: Vec<Task> = Self::parse(&content)?
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();

        info!("Loaded {} tasks from {}", tasks.len(), self.path.display());
        Ok(tasks)
    }
}
