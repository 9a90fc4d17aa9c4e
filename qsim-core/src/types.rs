//! Core type definitions and newtypes for the simulation engine

use crate::SimTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a customer class (0..nr_classes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(pub usize);

/// Index of a server (0..nr_servers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServerId(pub usize);

/// Slot of a customer inside a replication's customer arena
///
/// Slots are reused after a customer leaves the system, so an id is only
/// meaningful while the customer it was issued for is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CustomerId(pub usize);

/// Insertion sequence number of a scheduled event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event({})", self.0)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class({})", self.0)
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Server({})", self.0)
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Customer({})", self.0)
    }
}

/// A customer instance travelling through one replication.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub class: ClassId,
    pub arrival_time: SimTime,
    /// Set when a server starts serving this customer.
    pub service_start: Option<SimTime>,
    pub departure_time: SimTime,
    /// Server currently (or last) bound to this customer.
    pub server: Option<ServerId>,
}

impl Customer {
    pub fn new(class: ClassId) -> Self {
        Self {
            class,
            arrival_time: SimTime::zero(),
            service_start: None,
            departure_time: SimTime::zero(),
            server: None,
        }
    }

    /// Whether the customer is still waiting for a server.
    pub fn is_waiting(&self) -> bool {
        self.server.is_none()
    }

    /// Time spent between arrival and the start of service.
    ///
    /// Zero for customers that never started service.
    pub fn waiting_time(&self) -> f64 {
        self.service_start
            .map_or(0.0, |start| start.since(self.arrival_time))
    }

    /// Time spent between arrival and departure.
    pub fn sojourn_time(&self) -> f64 {
        self.departure_time.since(self.arrival_time)
    }

    /// Whether the customer had to wait before service started.
    pub fn waited(&self) -> bool {
        self.service_start
            .is_some_and(|start| start != self.arrival_time)
    }
}

/// A server and the customer classes it may serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    pub id: ServerId,
    eligibility: Vec<bool>,
}

impl Server {
    pub fn new(id: ServerId, eligibility: Vec<bool>) -> Self {
        Self { id, eligibility }
    }

    /// Whether this server may serve customers of `class`.
    pub fn serves(&self, class: ClassId) -> bool {
        self.eligibility.get(class.0).copied().unwrap_or(false)
    }

    pub fn eligibility(&self) -> &[bool] {
        &self.eligibility
    }
}
