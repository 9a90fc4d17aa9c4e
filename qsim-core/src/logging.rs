//! Structured logging for sweeps and replications
//!
//! Logging goes through `tracing`. The engine emits spans for the sweep, for each
//! utilization level and for each replication, and a handful of structured events
//! at the boundaries between them. Nothing is printed unless a subscriber is
//! installed, for example with [`init_simulation_logging`].
//!
//! # Controlling output
//!
//! ```bash
//! # Default (info level)
//! cargo run --example n_system
//!
//! # Per-level and per-replication progress
//! RUST_LOG=qsim_components=debug cargo run --example n_system
//!
//! # Every processed event (very verbose)
//! RUST_LOG=qsim_components::replication=trace cargo run --example n_system
//! ```
//!
//! ## Log level guidelines
//! - **TRACE**: individual arrivals, departures and matches
//! - **DEBUG**: replication and level boundaries
//! - **INFO**: sweep progress and the stability prescan outcome
//! - **WARN**: levels dropped because of instability
//! - **ERROR**: failed levels (internal invariant violations)

use tracing::{debug, error, info, warn, Span};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for the simulation with sensible defaults
pub fn init_simulation_logging() {
    init_simulation_logging_with_level("info")
}

/// Initialize logging with a specific level
///
/// `RUST_LOG` takes precedence when set. Installing a second global subscriber
/// is a no-op, so this can be called from several tests.
///
/// # Arguments
/// * `level` - Log level: "trace", "debug", "info", "warn", or "error"
pub fn init_simulation_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("{level},qsim_core={level},qsim_metrics={level},qsim_components={level}").into()
    });

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true),
        )
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        info!("Simulation logging initialized at level: {}", level);
    }
}

/// Initialize logging with custom configuration for advanced debugging
pub fn init_detailed_simulation_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "debug,qsim_components=trace,qsim_metrics=debug".into());

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .pretty(),
        )
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        info!("Detailed simulation logging initialized");
    }
}

/// Span covering a whole utilization sweep
pub fn sweep_span(nr_servers: usize, nr_classes: usize) -> Span {
    tracing::info_span!("sweep", servers = nr_servers, classes = nr_classes)
}

/// Span covering every replication of one utilization level
pub fn level_span(level: usize, utilization: f64) -> Span {
    tracing::debug_span!("level", level = level, utilization = utilization)
}

/// Span covering one replication
pub fn replication_span(run: usize) -> Span {
    tracing::trace_span!("replication", run = run)
}

/// Logging utilities for common simulation milestones
pub mod events {
    use super::*;

    /// Log the outcome of the stability prescan
    pub fn prescan_completed(level_count: usize, last_stable: Option<f64>) {
        info!(
            level_count = level_count,
            last_stable = ?last_stable,
            "Stability prescan completed"
        );
    }

    /// Log the completion of one replication
    pub fn replication_completed(run: usize, events_processed: u64, end_time: f64) {
        debug!(
            run = run,
            events_processed = events_processed,
            end_time = end_time,
            "Replication completed"
        );
    }

    /// Log the completion of one utilization level
    pub fn level_completed(level: usize, utilization: f64, runs: usize) {
        debug!(
            level = level,
            utilization = utilization,
            runs = runs,
            "Utilization level completed"
        );
    }

    /// Log the completion of the sweep
    pub fn sweep_completed(levels: usize, failures: usize) {
        info!(levels = levels, failures = failures, "Sweep completed");
    }
}

/// Logging utilities for error conditions and warnings
pub mod diagnostics {
    use super::*;

    /// Log the congestion subset that bounds the utilization range
    pub fn unstable_subset(class: usize, utilization: f64, arrival_rate: f64, service_rate: f64) {
        warn!(
            class = class,
            utilization = utilization,
            arrival_rate = arrival_rate,
            service_rate = service_rate,
            "Congestion subset unstable; sweep stops below this utilization"
        );
    }

    /// Log a level that produced no result
    pub fn level_failed(level: usize, error: &str) {
        error!(level = level, error = error, "Utilization level failed");
    }
}
