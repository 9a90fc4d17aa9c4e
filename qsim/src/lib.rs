//! # qsim - eligibility-constrained multi-class queue simulator
//!
//! qsim estimates steady-state waiting times, queue lengths, the probability of
//! waiting and busy-server configuration probabilities of a multi-server system
//! in which each customer class may only be served by some of the servers. It
//! sweeps the system utilization, runs independent replications at every level
//! and reports 95% confidence intervals.
//!
//! ## Feature Flags
//!
//! - `default`: Includes `components` and `metrics`
//! - `components`: Configuration, replication driver, stability prescan and sweep
//! - `metrics`: Result aggregation and JSON export
//!
//! ## Example
//!
//! ```rust
//! use qsim::prelude::*;
//!
//! let config = SimulationConfig::builder(Eligibility::dense(1, 1))
//!     .step_size(0.45)
//!     .departures_to_simulate(1_000.0)
//!     .seed(1)
//!     .build()
//!     .unwrap();
//!
//! let report = Sweep::new(&config).run().unwrap();
//! assert_eq!(report.levels.len(), 2);
//! ```

// Re-export core (always available)
pub use qsim_core as core;

#[cfg(feature = "components")]
pub use qsim_components as components;

#[cfg(feature = "metrics")]
pub use qsim_metrics as metrics;

// Convenience re-exports of commonly used items
pub mod prelude {
    //! Commonly used types and traits

    pub use qsim_core::{
        init_simulation_logging, ClassId, ConfigError, Family, ServerId, SimError, SimTime,
        VariateGenerator,
    };

    #[cfg(feature = "metrics")]
    pub use qsim_metrics::{
        export_json, ConfidenceInterval, ConfigurationOrdering, LevelSummary, Results,
    };

    #[cfg(feature = "components")]
    pub use qsim_components::{
        ClassParameters, Eligibility, ServerParameters, SimulationConfig, StabilityReport, Sweep,
        SweepReport,
    };
}
