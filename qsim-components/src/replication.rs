//! Replication driver
//!
//! A [`Replication`] runs one independent realisation of the queueing system at a
//! fixed utilization until every class has completed the configured number of
//! departures. Every event is handed to [`Results::register`] before it changes
//! the state of the system.

use qsim_core::logging::events;
use qsim_core::{
    replication_span, ClassId, CustomerId, Event, EventKind, FutureEvents, ServerId, SimError,
    SimRng, SimTime, VariateGenerator,
};
use qsim_metrics::Results;
use tracing::trace;

use crate::config::SimulationConfig;
use crate::registry::{CustomerRegistry, IdleServerRegistry, SystemView};

/// Variate generators shared by every replication of one utilization level.
#[derive(Debug, Clone)]
pub struct Generators {
    /// Inter-arrival time generator per class.
    pub arrivals: Vec<VariateGenerator>,
    /// Service time generator per server.
    pub services: Vec<VariateGenerator>,
}

impl Generators {
    /// Fresh generators for `config` loaded to `utilization`.
    pub fn for_level(config: &SimulationConfig, utilization: f64) -> Result<Self, SimError> {
        Ok(Self {
            arrivals: config.arrival_generators(utilization)?,
            services: config.service_generators()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicationState {
    Running,
    Complete,
}

/// Summary of a finished replication.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplicationOutcome {
    pub run: usize,
    pub events_processed: u64,
    pub end_time: SimTime,
}

/// One replication in progress.
pub struct Replication<'a> {
    run: usize,
    departures_to_simulate: f64,
    generators: &'a Generators,
    rng: &'a mut SimRng,
    results: &'a mut Results,
    events: FutureEvents,
    customers: CustomerRegistry,
    servers: IdleServerRegistry,
    state: ReplicationState,
    events_processed: u64,
}

impl<'a> Replication<'a> {
    /// Set up replication `run` with all servers idle and one pending arrival per class.
    pub fn new(
        run: usize,
        config: &SimulationConfig,
        generators: &'a Generators,
        rng: &'a mut SimRng,
        results: &'a mut Results,
    ) -> Result<Self, SimError> {
        if run >= results.runs() {
            return Err(SimError::Internal(format!(
                "replication {run} out of range for {} runs",
                results.runs()
            )));
        }

        let mut replication = Self {
            run,
            departures_to_simulate: config.departures_to_simulate(),
            generators,
            rng,
            results,
            events: FutureEvents::new(),
            customers: CustomerRegistry::new(),
            servers: IdleServerRegistry::new(config.eligibility().build_servers()),
            state: ReplicationState::Running,
            events_processed: 0,
        };
        for class in 0..config.nr_classes() {
            replication.schedule_arrival(ClassId(class), SimTime::zero())?;
        }
        Ok(replication)
    }

    /// Process the earliest pending event.
    pub fn step(&mut self) -> Result<ReplicationState, SimError> {
        if self.state == ReplicationState::Complete {
            return Ok(self.state);
        }

        let event = self.events.next_event()?;
        let customer = self
            .customers
            .get(event.customer)
            .ok_or_else(|| SimError::Internal(format!("{} is not alive", event.customer)))?;

        trace!(
            run = self.run,
            kind = %event.kind,
            time = event.time.as_f64(),
            class = customer.class.0,
            "Processing event"
        );

        let view = SystemView {
            customers: &self.customers,
            servers: &self.servers,
        };
        self.results.register(self.run, &event, customer, &view);

        match event.kind {
            EventKind::Arrival => self.arrive(event)?,
            EventKind::Departure => self.depart(event)?,
        }
        self.events_processed += 1;
        self.debug_check_invariants();

        if self.results.departure_counter(self.run) as f64 >= self.departures_to_simulate {
            self.state = ReplicationState::Complete;
        }
        Ok(self.state)
    }

    /// Step until the stopping condition holds.
    pub fn run(mut self) -> Result<ReplicationOutcome, SimError> {
        let _span = replication_span(self.run).entered();
        while self.step()? == ReplicationState::Running {}

        let outcome = ReplicationOutcome {
            run: self.run,
            events_processed: self.events_processed,
            end_time: self.events.time(),
        };
        events::replication_completed(outcome.run, outcome.events_processed, outcome.end_time.as_f64());
        Ok(outcome)
    }

    fn arrive(&mut self, event: Event) -> Result<(), SimError> {
        let id = event.customer;
        self.customers
            .check_in(id, event.time)
            .ok_or_else(|| SimError::Internal(format!("{id} cannot check in")))?;
        let class = self.customer_class(id)?;

        if let Some(server) = self.servers.find_eligible(class) {
            self.servers.remove(server);
            self.start_service(id, server, event.time)?;
        }
        self.schedule_arrival(class, event.time)
    }

    fn depart(&mut self, event: Event) -> Result<(), SimError> {
        let id = event.customer;
        let server = self
            .customers
            .get(id)
            .and_then(|c| c.server)
            .ok_or_else(|| SimError::Internal(format!("departure of {id} without a server")))?;

        match self.customers.find_waiting_eligible(self.servers.server(server)) {
            Some(next) => self.start_service(next, server, event.time)?,
            None => self.servers.add(server),
        }

        self.customers
            .check_out(id)
            .ok_or_else(|| SimError::Internal(format!("{id} cannot check out")))?;
        Ok(())
    }

    fn start_service(&mut self, id: CustomerId, server: ServerId, now: SimTime) -> Result<(), SimError> {
        let departure = now + self.generators.services[server.0].sample(&mut *self.rng);
        let customer = self
            .customers
            .get_mut(id)
            .ok_or_else(|| SimError::Internal(format!("{id} is not alive")))?;
        customer.server = Some(server);
        customer.service_start = Some(now);
        customer.departure_time = departure;
        self.events.schedule(Event::departure(departure, id))?;
        Ok(())
    }

    fn schedule_arrival(&mut self, class: ClassId, now: SimTime) -> Result<(), SimError> {
        let id = self.customers.admit(class);
        let time = now + self.generators.arrivals[class.0].sample(&mut *self.rng);
        self.events.schedule(Event::arrival(time, id))?;
        Ok(())
    }

    fn customer_class(&self, id: CustomerId) -> Result<ClassId, SimError> {
        self.customers
            .get(id)
            .map(|c| c.class)
            .ok_or_else(|| SimError::Internal(format!("{id} is not alive")))
    }

    fn debug_check_invariants(&self) {
        debug_assert_eq!(
            self.servers.busy() + self.servers.len(),
            self.servers.nr_servers()
        );
        debug_assert!(self.customers.len() >= self.servers.busy());
        debug_assert_eq!(self.customers.in_service(), self.servers.busy());
    }

    pub fn run_index(&self) -> usize {
        self.run
    }

    pub fn state(&self) -> ReplicationState {
        self.state
    }

    /// Time of the last processed event.
    pub fn time(&self) -> SimTime {
        self.events.time()
    }

    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    pub fn customers(&self) -> &CustomerRegistry {
        &self.customers
    }

    pub fn servers(&self) -> &IdleServerRegistry {
        &self.servers
    }

    pub fn results(&self) -> &Results {
        self.results
    }
}
