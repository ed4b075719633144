//! Per-task duration sampling.
//!
//! Each task's duration is modelled as a triangular distribution spanning
//! 70% to 200% of its nominal duration, with the pessimistic tail stretched
//! or shrunk by priority.

use rand::distributions::Distribution;
use rand::Rng;
use riskcast_core::{Priority, Task};

use crate::{Result, SimulationError};

/// Optimistic bound as a fraction of the nominal duration.
pub const OPTIMISTIC_FACTOR: f64 = 0.7;

/// Pessimistic bound as a multiple of the nominal duration.
pub const PESSIMISTIC_FACTOR: f64 = 2.0;

/// Pessimistic multiplier for `High` priority tasks.
pub const HIGH_PRIORITY_STRETCH: f64 = 1.5;

/// Pessimistic multiplier for `Low` priority tasks.
pub const LOW_PRIORITY_STRETCH: f64 = 0.8;

/// Triangular distribution over `[min, max]` with peak at `mode`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangular {
    min: f64,
    mode: f64,
    max: f64,
}

impl Triangular {
    /// Create a distribution; requires finite `min <= mode <= max`.
    pub fn new(min: f64, mode: f64, max: f64) -> Result<Self> {
        let finite = min.is_finite() && mode.is_finite() && max.is_finite();
        if !finite || min > mode || mode > max {
            return Err(SimulationError::InvalidDistribution { min, mode, max });
        }
        Ok(Self { min, mode, max })
    }

    /// Lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Most likely value.
    pub fn mode(&self) -> f64 {
        self.mode
    }

    /// Upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Distribution mean, `(min + mode + max) / 3`.
    pub fn mean(&self) -> f64 {
        (self.min + self.mode + self.max) / 3.0
    }

    /// Inverse CDF at `u` in `[0, 1)`.
    pub fn quantile(&self, u: f64) -> f64 {
        let width = self.max - self.min;
        if width == 0.0 {
            return self.min;
        }
        let split = (self.mode - self.min) / width;
        if u < split {
            self.min + (u * width * (self.mode - self.min)).sqrt()
        } else {
            self.max - ((1.0 - u) * width * (self.max - self.mode)).sqrt()
        }
    }
}

impl Distribution<f64> for Triangular {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        // Degenerate: no randomness to consume.
        if self.min == self.max {
            return self.min;
        }
        self.quantile(rng.gen::<f64>())
    }
}

/// Sampling parameters derived from one task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskDistribution {
    /// Un-randomized duration
    pub nominal: f64,
    /// Lower bound
    pub optimistic: f64,
    /// Peak
    pub most_likely: f64,
    /// Upper bound after priority adjustment
    pub pessimistic: f64,
}

impl TaskDistribution {
    /// Derive the distribution for a task.
    pub fn for_task(task: &Task) -> Self {
        let nominal = task.nominal_hours();
        let stretch = match task.priority {
            Some(Priority::High) => HIGH_PRIORITY_STRETCH,
            Some(Priority::Low) => LOW_PRIORITY_STRETCH,
            _ => 1.0,
        };

        Self {
            nominal,
            optimistic: nominal * OPTIMISTIC_FACTOR,
            most_likely: nominal,
            pessimistic: nominal * PESSIMISTIC_FACTOR * stretch,
        }
    }

    /// The triangular distribution to sample from.
    ///
    /// Out-of-order parameters (only reachable with a corrupt nominal) collapse
    /// to a constant at the nominal duration.
    pub fn triangular(&self) -> Triangular {
        Triangular::new(self.optimistic, self.most_likely, self.pessimistic).unwrap_or(Triangular {
            min: self.nominal,
            mode: self.nominal,
            max: self.nominal,
        })
    }
}
