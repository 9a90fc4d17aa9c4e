//! Cross-replication estimators
//!
//! Every replication contributes one estimate per metric (a time average or a
//! per-customer average over many events). Those estimates are treated as i.i.d.
//! samples, so a normal-approximation interval `mean ± 1.96·σ/√runs` is used.

use serde::Serialize;

/// Two-sided 95% standard normal quantile.
pub const Z_95: f64 = 1.96;

/// Running mean and variance over a stream of replication estimates.
///
/// Uses Welford's update, which yields the same population variance as
/// `E[X²] − E[X]²` without the cancellation error of subtracting two large sums.
#[derive(Debug, Clone, Default)]
pub struct RunningMoments {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningMoments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.mean
        }
    }

    /// Population variance (divides by the number of samples).
    pub fn population_variance(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            (self.m2 / self.count as f64).max(0.0)
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.population_variance().sqrt()
    }

    /// 95% confidence interval for the mean.
    pub fn confidence_interval(&self) -> ConfidenceInterval {
        ConfidenceInterval {
            mean: self.mean(),
            half_width: Z_95 * self.std_dev() / (self.count as f64).sqrt(),
        }
    }
}

impl FromIterator<f64> for RunningMoments {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut moments = RunningMoments::new();
        for value in iter {
            moments.push(value);
        }
        moments
    }
}

/// A mean together with its 95% confidence half-width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub mean: f64,
    pub half_width: f64,
}

impl ConfidenceInterval {
    pub fn lower(&self) -> f64 {
        self.mean - self.half_width
    }

    pub fn upper(&self) -> f64 {
        self.mean + self.half_width
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower() <= value && value <= self.upper()
    }
}

/// `n!`, saturating at `u64::MAX`.
pub fn factorial(n: u32) -> u64 {
    (1..=u64::from(n)).fold(1u64, |acc, k| acc.saturating_mul(k))
}
