//! Stability prescan
//!
//! Before any replication runs, the sweep determines how far the utilization
//! can be raised while every congestion subset stays stable. The subset of
//! class `i` is made of `i` and every class whose eligible servers are all
//! eligible for `i` too; those customers can only be served by `i`'s servers, so
//! their joint arrival rate must stay below the service rate of `i`'s servers.

use qsim_core::logging::{diagnostics, events};
use qsim_core::ClassId;
use serde::Serialize;

use crate::config::SimulationConfig;

/// Lowest simulated utilization.
pub const MIN_UTILIZATION: f64 = 0.05;

/// Utilizations at or above this bound are never simulated.
pub const MAX_UTILIZATION: f64 = 0.95;

const UTILIZATION_EPSILON: f64 = 1e-9;

/// Utilization of sweep level `level` (level 1 is the lowest).
pub fn utilization_for_level(level: usize, step_size: f64) -> f64 {
    MIN_UTILIZATION + level.saturating_sub(1) as f64 * step_size
}

/// Whether class `other` belongs to the congestion subset of class `class`.
pub fn class_in_subset(config: &SimulationConfig, class: ClassId, other: ClassId) -> bool {
    config.eligibility().is_subset(other, class)
}

/// Total service rate of the servers eligible for `class`.
pub fn subset_service_rate(config: &SimulationConfig, class: ClassId) -> f64 {
    config
        .eligibility()
        .servers_for(class)
        .map(|server| config.servers()[server.0].rate())
        .sum()
}

/// Arrival rate into the congestion subset of `class` at total arrival rate `lambda`.
pub fn subset_arrival_rate(config: &SimulationConfig, class: ClassId, lambda: f64) -> f64 {
    let own = config.classes()[class.0].fraction * lambda;
    (0..config.nr_classes())
        .map(ClassId)
        .filter(|&other| other != class && class_in_subset(config, class, other))
        .map(|other| config.classes()[other.0].fraction * lambda)
        .fold(own, |acc, rate| acc + rate)
}

/// The congestion subset that stopped the prescan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LimitingSubset {
    pub class: ClassId,
    pub utilization: f64,
    pub arrival_rate: f64,
    pub service_rate: f64,
}

/// Outcome of the prescan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StabilityReport {
    /// One more than the number of simulatable levels; level 0 is never used.
    pub level_count: usize,
    /// Highest stable utilization, if any.
    pub last_stable: Option<f64>,
    /// Subset that became unstable below [`MAX_UTILIZATION`], if any.
    pub limiting: Option<LimitingSubset>,
}

impl StabilityReport {
    /// Utilization levels to simulate.
    pub fn levels(&self) -> std::ops::Range<usize> {
        1..self.level_count.max(1)
    }

    pub fn is_empty(&self) -> bool {
        self.level_count <= 1
    }
}

fn first_unstable(config: &SimulationConfig, utilization: f64) -> Option<LimitingSubset> {
    let lambda = config.arrival_rate(utilization);
    (0..config.nr_classes()).map(ClassId).find_map(|class| {
        let arrival_rate = subset_arrival_rate(config, class, lambda);
        let service_rate = subset_service_rate(config, class);
        // Negated so that a NaN rate also counts as unstable.
        (!(arrival_rate < service_rate)).then_some(LimitingSubset {
            class,
            utilization,
            arrival_rate,
            service_rate,
        })
    })
}

/// Scan candidate utilizations `0.05 + k·step` below 0.95 until a subset becomes unstable.
pub fn prescan(config: &SimulationConfig) -> StabilityReport {
    let step = config.step_size();
    let mut stable = 0usize;
    let mut last_stable = None;
    let mut limiting = None;

    loop {
        let utilization = MIN_UTILIZATION + stable as f64 * step;
        if utilization >= MAX_UTILIZATION - UTILIZATION_EPSILON {
            break;
        }
        if let Some(subset) = first_unstable(config, utilization) {
            diagnostics::unstable_subset(
                subset.class.0,
                subset.utilization,
                subset.arrival_rate,
                subset.service_rate,
            );
            limiting = Some(subset);
            break;
        }
        last_stable = Some(utilization);
        stable += 1;
    }

    let report = StabilityReport {
        level_count: stable + 1,
        last_stable,
        limiting,
    };
    events::prescan_completed(report.level_count, report.last_stable);
    report
}
