//! Core building blocks of the queue simulator.
//!
//! This crate provides the pieces every replication is assembled from:
//! simulation time, the future-events list, variate generators and the
//! per-task random source.
//!
//! # Architecture Overview
//!
//! - [`FutureEvents`]: binary-heap scheduler of [`Event`]s, ordered by time and
//!   then by insertion, so identical inputs always replay identically.
//! - [`VariateGenerator`]: deterministic, uniform, exponential and balanced
//!   two-phase hyperexponential samplers built from a mean and a coefficient of
//!   variation.
//! - [`SimRng`]: the random source. It is owned by one task and handed to every
//!   draw explicitly.
//!
//! # Basic Usage
//!
//! ```rust
//! use qsim_core::{CustomerId, Event, Family, FutureEvents, SimTime, VariateGenerator};
//! use qsim_core::randomness::stream_rng;
//!
//! let mut rng = stream_rng(Some(7), 1);
//! let service = VariateGenerator::new(Family::Exponential, 1.0, 1.0).unwrap();
//!
//! let mut events = FutureEvents::new();
//! let t = SimTime::zero() + service.sample(&mut rng);
//! events.schedule(Event::departure(t, CustomerId(0))).unwrap();
//! assert_eq!(events.pop().map(|e| e.time), Some(t));
//! ```

pub mod dists;
pub mod error;
pub mod logging;
pub mod randomness;
pub mod scheduler;
pub mod time;
pub mod types;

pub use dists::{Family, Variate, VariateGenerator};
pub use error::{ConfigError, EventError, SimError};
pub use logging::{
    init_detailed_simulation_logging, init_simulation_logging, init_simulation_logging_with_level,
    level_span, replication_span, sweep_span,
};
pub use randomness::SimRng;
pub use scheduler::{Event, EventKind, FutureEvents};
pub use time::SimTime;
pub use types::{ClassId, Customer, CustomerId, EventId, Server, ServerId};
