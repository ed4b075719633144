//! Simulation errors.

/// Error type for simulation operations.
pub type Result<T> = std::result::Result<T, SimulationError>;

/// Errors that can occur while running a simulation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    /// The request cannot be simulated at all
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Triangular parameters are not ordered or not finite
    #[error("Invalid distribution: min={min}, mode={mode}, max={max}")]
    InvalidDistribution {
        /// Lower bound
        min: f64,
        /// Most likely value
        mode: f64,
        /// Upper bound
        max: f64,
    },
}
