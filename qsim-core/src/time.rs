//! Simulation time management

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

/// Simulation time in model time units
///
/// SimTime represents a point in simulation time as a non-negative, finite `f64`
/// measured from the start of a replication. Queueing models are parameterized by
/// dimensionless means (service mean 1.0, arrival rate ρ·μ, ...) so time is kept
/// continuous rather than quantized. Ordering is total (`f64::total_cmp`) so the
/// type can key a priority queue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimTime(f64);

impl SimTime {
    /// Create a new SimTime at the simulation start (time zero)
    pub const fn zero() -> Self {
        SimTime(0.0)
    }

    /// Create a SimTime from a raw time value
    ///
    /// # Panics
    ///
    /// Panics if the input is negative, infinite, or NaN.
    pub fn new(time: f64) -> Self {
        if !time.is_finite() {
            panic!("SimTime cannot be created from non-finite value: {time}");
        }
        if time < 0.0 {
            panic!("SimTime cannot be negative: {time}");
        }
        SimTime(time)
    }

    /// Get the raw time value
    pub const fn as_f64(&self) -> f64 {
        self.0
    }

    /// Elapsed time since an earlier instant, saturating at zero
    pub fn since(&self, earlier: SimTime) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

impl Default for SimTime {
    fn default() -> Self {
        SimTime::zero()
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Add<f64> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: f64) -> Self::Output {
        SimTime::new(self.0 + rhs)
    }
}

impl Sub<SimTime> for SimTime {
    type Output = f64;

    fn sub(self, rhs: SimTime) -> Self::Output {
        self.0 - rhs.0
    }
}

impl From<f64> for SimTime {
    fn from(time: f64) -> Self {
        SimTime::new(time)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.6}", self.0)
    }
}
