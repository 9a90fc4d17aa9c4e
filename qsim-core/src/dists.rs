//! Variate generators for inter-arrival and service times
//!
//! Every generator is described by a mean and a coefficient of variation and
//! belongs to one of four families. A generator holds no random state of its
//! own: the random source is passed to [`VariateGenerator::sample`], so a
//! parallel task can own a single source and feed every generator it builds.
//!
//! | family             | parameters used | variance                         |
//! |--------------------|-----------------|----------------------------------|
//! | `Deterministic`    | mean            | 0                                |
//! | `Uniform`          | mean            | (2·mean)² / 12                   |
//! | `Exponential`      | mean            | mean²                            |
//! | `HyperExponential2`| mean, cv ≥ 1    | 2(p0/λ0² + p1/λ1²) − mean²       |

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand_distr::{Distribution, Open01, Uniform};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Distribution family of a variate generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Family {
    Deterministic,
    Uniform,
    #[default]
    Exponential,
    #[serde(rename = "HyperExponential2")]
    HyperExponential2,
}

impl Family {
    pub fn name(&self) -> &'static str {
        match self {
            Family::Deterministic => "Deterministic",
            Family::Uniform => "Uniform",
            Family::Exponential => "Exponential",
            Family::HyperExponential2 => "HyperExponential2",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Deterministic" => Ok(Family::Deterministic),
            "Uniform" => Ok(Family::Uniform),
            "Exponential" => Ok(Family::Exponential),
            "HyperExponential2" => Ok(Family::HyperExponential2),
            other => Err(ConfigError::UnknownFamily(other.to_string())),
        }
    }
}

/// Family-specific sampling parameters.
#[derive(Debug, Clone)]
pub enum Variate {
    Deterministic { value: f64 },
    Uniform { range: Uniform<f64> },
    Exponential { mean: f64 },
    /// Two exponential phases with balanced means, picked with probability `p0`.
    HyperExponential2 { p0: f64, rates: [f64; 2] },
}

impl Variate {
    /// Draw one value using `rng`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Variate::Deterministic { value } => *value,
            Variate::Uniform { range } => range.sample(rng),
            Variate::Exponential { mean } => -open_unit(rng).ln() * mean,
            Variate::HyperExponential2 { p0, rates } => {
                let branch: f64 = rng.gen();
                let rate = if branch < *p0 { rates[0] } else { rates[1] };
                -open_unit(rng).ln() / rate
            }
        }
    }
}

/// Uniform draw from (0, 1), never returning zero so its logarithm is finite.
fn open_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    Open01.sample(rng)
}

/// A sampler for one inter-arrival or service time distribution.
///
/// Moments are computed once at construction. `residual` is the mean residual
/// time `(Var + mean²) / (2·mean)`; it is reported for analytical estimates and
/// never used by the event loop.
#[derive(Debug, Clone)]
pub struct VariateGenerator {
    family: Family,
    variate: Variate,
    mean: f64,
    variance: f64,
    cv: f64,
    residual: f64,
}

impl VariateGenerator {
    /// Build a generator for `family` with the given mean and coefficient of variation.
    ///
    /// For `HyperExponential2` the phase split `p0 = ½(1 + √((cv−1)/(cv+1)))` makes
    /// the variance `cv·mean²`, so `cv` acts as the squared coefficient of
    /// variation. The other families ignore it.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the mean is not a positive finite number, or
    /// when a hyperexponential generator is requested with `cv < 1`.
    pub fn new(family: Family, mean: f64, cv: f64) -> Result<Self, ConfigError> {
        if !mean.is_finite() || mean <= 0.0 {
            return Err(ConfigError::ConstraintViolation {
                field: format!("{family} mean"),
                constraint: "a positive finite number".to_string(),
            });
        }

        let (variate, variance, cv) = match family {
            Family::Deterministic => (Variate::Deterministic { value: mean }, 0.0, 0.0),
            Family::Uniform => {
                let width = 2.0 * mean;
                if !width.is_finite() {
                    return Err(ConfigError::ConstraintViolation {
                        field: "Uniform mean".to_string(),
                        constraint: format!("at most {}", f64::MAX / 2.0),
                    });
                }
                let variance = width * width / 12.0;
                (
                    Variate::Uniform {
                        range: Uniform::new(0.0, width),
                    },
                    variance,
                    variance.sqrt() / mean,
                )
            }
            Family::Exponential => (Variate::Exponential { mean }, mean * mean, 1.0),
            Family::HyperExponential2 => {
                if !cv.is_finite() || cv < 1.0 {
                    return Err(ConfigError::ConstraintViolation {
                        field: "HyperExponential2 cv".to_string(),
                        constraint: "at least 1".to_string(),
                    });
                }
                let p0 = 0.5 * (1.0 + ((cv - 1.0) / (cv + 1.0)).sqrt());
                let p1 = 1.0 - p0;
                let rates = [2.0 * p0 / mean, 2.0 * p1 / mean];
                let variance =
                    2.0 * (p0 / (rates[0] * rates[0]) + p1 / (rates[1] * rates[1])) - mean * mean;
                // A huge cv rounds the slow phase away.
                if p1 <= 0.0 || !rates[1].is_normal() || !variance.is_finite() {
                    return Err(ConfigError::ConstraintViolation {
                        field: "HyperExponential2 cv".to_string(),
                        constraint: "small enough to keep both phases".to_string(),
                    });
                }
                (Variate::HyperExponential2 { p0, rates }, variance, cv)
            }
        };

        Ok(Self {
            family,
            variate,
            mean,
            variance,
            cv,
            residual: (variance + mean * mean) / (2.0 * mean),
        })
    }

    /// Exponential generator with the given rate, used for Poisson arrivals.
    pub fn exponential_with_rate(rate: f64) -> Result<Self, ConfigError> {
        Self::new(Family::Exponential, 1.0 / rate, 1.0)
    }

    /// Draw one non-negative value.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.variate.sample(rng)
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn rate(&self) -> f64 {
        1.0 / self.mean
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }

    pub fn cv(&self) -> f64 {
        self.cv
    }

    pub fn residual(&self) -> f64 {
        self.residual
    }

    pub fn variate(&self) -> &Variate {
        &self.variate
    }
}
