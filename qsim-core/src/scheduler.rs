use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use crate::error::EventError;
use crate::types::{CustomerId, EventId};
use crate::SimTime;

/// What happens to the customer when the event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Arrival,
    Departure,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Arrival => write!(f, "Arrival"),
            EventKind::Departure => write!(f, "Departure"),
        }
    }
}

/// A pending arrival or departure of one customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub time: SimTime,
    pub customer: CustomerId,
}

impl Event {
    pub fn arrival(time: SimTime, customer: CustomerId) -> Self {
        Self {
            kind: EventKind::Arrival,
            time,
            customer,
        }
    }

    pub fn departure(time: SimTime, customer: CustomerId) -> Self {
        Self {
            kind: EventKind::Departure,
            time,
            customer,
        }
    }
}

/// Entry type stored in the scheduler's priority queue.
///
/// Entries are ordered by event time and then by the sequence number assigned on
/// insertion, so events sharing a timestamp leave the queue in the order they
/// were scheduled.
#[derive(Debug)]
struct EventEntry {
    id: EventId,
    event: Event,
}

impl PartialEq for EventEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EventEntry {}

impl PartialOrd for EventEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse the ordering for min-heap behavior in BinaryHeap
        other
            .event
            .time
            .cmp(&self.event.time)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Future-events list of one replication.
///
/// Keeps the current simulation time and the upcoming events. Popping an event
/// advances the clock to that event's time.
#[derive(Debug, Default)]
pub struct FutureEvents {
    next_event_id: u64,
    events: BinaryHeap<EventEntry>,
    clock: SimTime,
}

impl FutureEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `event` at its absolute time.
    ///
    /// Events in the past of the current clock are rejected.
    pub fn schedule(&mut self, event: Event) -> Result<EventId, EventError> {
        if event.time < self.clock {
            return Err(EventError::ScheduleInPast {
                event_time: event.time.as_f64(),
                now: self.clock.as_f64(),
            });
        }
        let id = EventId(self.next_event_id);
        self.next_event_id += 1;
        self.events.push(EventEntry { id, event });
        Ok(id)
    }

    /// Returns the current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.clock
    }

    /// Returns the time of the next scheduled event or `None` if none are left.
    pub fn peek_time(&self) -> Option<SimTime> {
        self.events.peek().map(|entry| entry.event.time)
    }

    /// Removes and returns the next scheduled event or `None` if none are left.
    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop().map(|entry| {
            self.clock = entry.event.time;
            entry.event
        })
    }

    /// Like [`FutureEvents::pop`], but an empty queue is an error.
    pub fn next_event(&mut self) -> Result<Event, EventError> {
        self.pop().ok_or(EventError::EmptyQueue)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
