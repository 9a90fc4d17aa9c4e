//! Simulation components of the queue simulator
//!
//! This crate assembles the engine pieces of `qsim-core` into a complete
//! utilization sweep:
//!
//! - [`config`]: validated sweep configuration and the keyed parameter setters.
//! - [`registry`]: idle-server and present-customer registries with first-fit
//!   eligibility matching.
//! - [`replication`]: the event loop of a single replication.
//! - [`stability`]: the prescan that bounds the utilization range.
//! - [`sweep`]: parallel execution of every stable utilization level.

pub mod config;
pub mod registry;
pub mod replication;
pub mod stability;
pub mod sweep;

pub use config::{
    ClassParameters, Eligibility, ParameterKey, ServerParameters, SimulationConfig,
    SimulationConfigBuilder,
};
pub use registry::{CustomerRegistry, IdleServerRegistry, SystemView};
pub use replication::{Generators, Replication, ReplicationOutcome, ReplicationState};
pub use stability::{prescan, utilization_for_level, LimitingSubset, StabilityReport};
pub use sweep::{run_level, LevelFailure, LevelResult, Sweep, SweepReport};
