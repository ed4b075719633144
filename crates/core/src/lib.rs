//! riskcast core data models.
//!
//! This crate defines the task records fed into the schedule simulation and
//! the result records it produces.

#![warn(missing_docs)]

// Core identities
mod id;

// Task input
mod task;
mod timestamp;

// Simulation output
mod result;

// Re-exports
pub use id::*;

pub use task::{Task, Priority, DEFAULT_TASK_HOURS};
pub use timestamp::{parse_timestamp, MalformedTaskError};
pub use result::{SimulationResult, TaskAnalysis, RiskAnalysis, RiskLevel};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
