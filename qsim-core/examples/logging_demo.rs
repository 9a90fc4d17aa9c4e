//! Demonstration of the logging setup in qsim-core
//!
//! Drives a few hundred events of a single-server queue by hand while emitting
//! the same spans and milestones a full sweep would.
//!
//! Usage examples:
//! - Default (info level): cargo run --example logging_demo
//! - Debug level: RUST_LOG=debug cargo run --example logging_demo
//! - Module-specific: RUST_LOG=qsim_core=trace cargo run --example logging_demo

use qsim_core::logging::events;
use qsim_core::randomness::stream_rng;
use qsim_core::{
    init_simulation_logging, level_span, replication_span, sweep_span, CustomerId, Event,
    EventKind, FutureEvents, SimTime, VariateGenerator,
};
use tracing::{debug, info};

fn main() {
    init_simulation_logging();

    let _sweep = sweep_span(1, 1).entered();
    let _level = level_span(1, 0.5).entered();
    let _replication = replication_span(0).entered();

    let mut rng = stream_rng(Some(1), 1);
    let arrivals = VariateGenerator::exponential_with_rate(0.5).expect("positive rate");
    let service = VariateGenerator::exponential_with_rate(1.0).expect("positive rate");

    let mut scheduler = FutureEvents::new();
    scheduler
        .schedule(Event::arrival(SimTime::zero() + arrivals.sample(&mut rng), CustomerId(0)))
        .expect("future event");

    let mut in_system = 0usize;
    let mut processed = 0u64;
    while processed < 500 {
        let Some(event) = scheduler.pop() else { break };
        processed += 1;
        match event.kind {
            EventKind::Arrival => {
                in_system += 1;
                let next = event.time + arrivals.sample(&mut rng);
                scheduler
                    .schedule(Event::arrival(next, CustomerId(event.customer.0 + 1)))
                    .expect("future event");
                if in_system == 1 {
                    let done = event.time + service.sample(&mut rng);
                    scheduler.schedule(Event::departure(done, event.customer)).expect("future event");
                }
            }
            EventKind::Departure => {
                in_system -= 1;
                if in_system > 0 {
                    let done = event.time + service.sample(&mut rng);
                    scheduler.schedule(Event::departure(done, event.customer)).expect("future event");
                }
            }
        }
        debug!(time = %event.time, kind = %event.kind, in_system, "Processed event");
    }

    events::replication_completed(0, processed, scheduler.time().as_f64());
    info!(pending = scheduler.len(), "Demo finished");
}
