//! Utilization sweep
//!
//! The sweep runs the stability prescan once, then simulates every stable
//! utilization level on a bounded rayon pool. Levels are independent: each one
//! owns its random source, its generators and its [`Results`], and runs its
//! replications one after the other. Results are reported in level order no
//! matter which worker finished first.

use qsim_core::logging::{diagnostics, events};
use qsim_core::randomness::stream_rng;
use qsim_core::{level_span, sweep_span, SimError};
use qsim_metrics::{LevelSummary, Results};
use rayon::prelude::*;
use tracing::{debug, Span};

use crate::config::SimulationConfig;
use crate::replication::{Generators, Replication};
use crate::stability::{prescan, utilization_for_level, StabilityReport};

/// Results of one simulated utilization level.
#[derive(Debug, Clone)]
pub struct LevelResult {
    pub level: usize,
    pub utilization: f64,
    pub results: Results,
}

/// A level that stopped on an internal error and produced no results.
#[derive(Debug)]
pub struct LevelFailure {
    pub level: usize,
    pub utilization: f64,
    pub error: SimError,
}

/// Everything a sweep produced.
#[derive(Debug)]
pub struct SweepReport {
    pub stability: StabilityReport,
    /// Successful levels in ascending level order.
    pub levels: Vec<LevelResult>,
    pub failures: Vec<LevelFailure>,
}

impl SweepReport {
    pub fn level(&self, level: usize) -> Option<&LevelResult> {
        self.levels.iter().find(|l| l.level == level)
    }

    /// Summaries of the successful levels, in level order.
    pub fn summaries(&self) -> Vec<LevelSummary> {
        self.levels.iter().map(|l| l.results.summarize()).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Simulate every replication of `level` into a fresh [`Results`].
pub fn run_level(config: &SimulationConfig, level: usize) -> Result<Results, SimError> {
    let utilization = utilization_for_level(level, config.step_size());
    let _span = level_span(level, utilization).entered();

    let mut rng = stream_rng(config.seed(), level as u64);
    let generators = Generators::for_level(config, utilization)?;
    let mut results = Results::new(
        utilization,
        config.nr_servers(),
        config.nr_classes(),
        config.runs(),
        config.configuration_ordering(),
    );

    for run in 0..config.runs() {
        Replication::new(run, config, &generators, &mut rng, &mut results)?.run()?;
    }

    events::level_completed(level, utilization, config.runs());
    Ok(results)
}

/// Split per-level outcomes into published results and failures.
///
/// A failed level contributes nothing to the results. Both lists keep the
/// order of `outcomes`.
fn collect_outcomes(
    outcomes: Vec<(usize, Result<Results, SimError>)>,
    step_size: f64,
) -> (Vec<LevelResult>, Vec<LevelFailure>) {
    let mut levels = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for (level, outcome) in outcomes {
        let utilization = utilization_for_level(level, step_size);
        match outcome {
            Ok(results) => levels.push(LevelResult {
                level,
                utilization,
                results,
            }),
            Err(error) => {
                diagnostics::level_failed(level, &error.to_string());
                failures.push(LevelFailure {
                    level,
                    utilization,
                    error,
                });
            }
        }
    }
    (levels, failures)
}

/// A utilization sweep over a validated configuration.
#[derive(Debug, Clone)]
pub struct Sweep<'a> {
    config: &'a SimulationConfig,
}

impl<'a> Sweep<'a> {
    pub fn new(config: &'a SimulationConfig) -> Self {
        Self { config }
    }

    /// Run the prescan and every stable level.
    ///
    /// Fails only when the worker pool cannot be created. A level that hits an
    /// internal error is recorded in [`SweepReport::failures`].
    pub fn run(&self) -> Result<SweepReport, SimError> {
        let config = self.config;
        let sweep = sweep_span(config.nr_servers(), config.nr_classes());
        let _guard = sweep.enter();

        let stability = prescan(config);
        let levels = stability.levels();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads())
            .thread_name(|i| format!("qsim-level-{i}"))
            .build()
            .map_err(|e| SimError::ThreadPool {
                message: e.to_string(),
            })?;
        debug!(threads = config.threads(), levels = levels.len(), "Starting level workers");

        let parent = Span::current();
        let outcomes: Vec<(usize, Result<Results, SimError>)> = pool.install(|| {
            levels
                .into_par_iter()
                .map(|level| (level, parent.in_scope(|| run_level(config, level))))
                .collect()
        });

        let (levels, failures) = collect_outcomes(outcomes, config.step_size());
        let report = SweepReport {
            stability,
            levels,
            failures,
        };

        events::sweep_completed(report.levels.len(), report.failures.len());
        Ok(report)
    }
}
