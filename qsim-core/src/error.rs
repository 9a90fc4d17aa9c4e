//! Error types for the simulation engine

use thiserror::Error;

/// Top-level error type for simulation operations
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Event error: {0}")]
    Event(#[from] EventError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Worker pool could not be created: {message}")]
    ThreadPool { message: String },
}

/// Errors detected while validating a configuration, before any simulation runs
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unknown distribution family: {0}")]
    UnknownFamily(String),

    #[error("Unknown parameter key: {0}")]
    UnknownParameter(String),

    #[error("Invalid value '{value}' for parameter '{key}'")]
    UnparsableValue { key: String, value: String },

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Field '{field}' must be {constraint}")]
    ConstraintViolation { field: String, constraint: String },

    #[error("Malformed eligibility matrix: {0}")]
    MalformedEligibility(String),

    #[error("Expected {expected} {what} parameter sets, got {actual}")]
    ParameterCount {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("The sum of the customer arrival rate fractions is {sum}, expected 1")]
    FractionSum { sum: f64 },
}

/// Errors related to event scheduling and handling
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EventError {
    #[error("Event queue is empty")]
    EmptyQueue,

    #[error("Event scheduling failed: event at {event_time} precedes clock at {now}")]
    ScheduleInPast { event_time: f64, now: f64 },
}
