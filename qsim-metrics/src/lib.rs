//! Replication statistics for the queue simulator
//!
//! This crate turns the raw event stream of each replication into per-level
//! estimates: time-average occupancy, sojourn and waiting times, the
//! probability of waiting and the probability of every busy-server
//! configuration seen by arriving customers. Estimates across replications are
//! reported with 95% confidence intervals.

pub mod configuration;
pub mod error;
pub mod estimate;
pub mod export;
pub mod results;

pub use configuration::{BusyConfiguration, ConfigurationOrdering};
pub use error::MetricsError;
pub use estimate::{factorial, ConfidenceInterval, RunningMoments, Z_95};
pub use export::{export_json, to_json_string, JsonExporter, SummaryExporter};
pub use results::{
    ClassConfigurations, ConfigurationProbability, LevelSummary, OccupancyView,
    ReplicationStats, Results,
};
