//! Schedule simulation (Layer 2)
//!
//! Monte Carlo sampling of task durations, percentile forecasts, critical-path
//! ranking and schedule/resource/scope risk scoring.

#![warn(missing_docs)]

pub mod error;
pub mod config;
pub mod sampler;
pub mod stats;
pub mod run;
pub mod risk;
pub mod assessment;
pub mod engine;

pub use error::{SimulationError, Result};
pub use config::{SimulationConfig, DEFAULT_SIMULATIONS, MAX_SAMPLES, MAX_SIMULATIONS};
pub use sampler::{Triangular, TaskDistribution};
pub use stats::Summary;
pub use run::SimulationRun;
pub use risk::{RiskScorer, RiskThresholds};
pub use engine::{MonteCarloEngine, run_simulation};
