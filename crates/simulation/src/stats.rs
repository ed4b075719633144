//! Descriptive statistics over sample sequences.

use std::cmp::Ordering;

/// Summary statistics of a sample sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Number of samples
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator; 0 for one sample)
    pub std_dev: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
}

impl Summary {
    /// Summarize a sequence. An empty sequence summarizes to all zeros.
    pub fn of(samples: &[f64]) -> Self {
        let count = samples.len();
        if count == 0 {
            return Self { count, mean: 0.0, std_dev: 0.0, min: 0.0, max: 0.0 };
        }

        let mean = samples.iter().sum::<f64>() / count as f64;
        let std_dev = if count > 1 {
            let ss: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            0.0
        };
        let (min, max) = samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));

        Self { count, mean, std_dev, min, max }
    }

    /// Coefficient of variation; zero when the mean carries no signal.
    pub fn coefficient_of_variation(&self) -> f64 {
        coefficient_of_variation(self.mean, self.std_dev)
    }
}

/// `std_dev / mean`, or 0 when the ratio is undefined.
pub fn coefficient_of_variation(mean: f64, std_dev: f64) -> f64 {
    if mean == 0.0 || !mean.is_finite() {
        return 0.0;
    }
    let cv = std_dev / mean;
    if cv.is_finite() { cv } else { 0.0 }
}

/// Sort a copy of the samples in ascending order.
pub fn sorted(samples: &[f64]) -> Vec<f64> {
    let mut xs = samples.to_vec();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    xs
}

/// Percentile `p` (0-100) of ascending `sorted` samples.
///
/// The target position is `p * (n + 1) / 100` on a one-based rank scale;
/// positions below the first rank clamp to the minimum, positions at or past
/// the last clamp to the maximum, and anything in between interpolates
/// linearly between the two neighbouring order statistics.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted[0];
    }

    let pos = p.clamp(0.0, 100.0) * (n as f64 + 1.0) / 100.0;
    if pos < 1.0 {
        return sorted[0];
    }
    if pos >= n as f64 {
        return sorted[n - 1];
    }

    let rank = pos.floor();
    let frac = pos - rank;
    let lower = sorted[rank as usize - 1];
    let upper = sorted[rank as usize];
    lower + frac * (upper - lower)
}

/// Pearson correlation of two equally long sequences.
///
/// Returns 0 for mismatched or empty inputs and when either side is constant.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.is_empty() {
        return 0.0;
    }

    let n = xs.len() as f64;
    let mx = xs.iter().sum::<f64>() / n;
    let my = ys.iter().sum::<f64>() / n;

    let (mut cov, mut vx, mut vy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mx, y - my);
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }

    let den = (vx * vy).sqrt();
    if den == 0.0 || !den.is_finite() {
        return 0.0;
    }
    cov / den
}
