//! Per-level result aggregation
//!
//! A [`Results`] instance belongs to one utilization level. Every replication of
//! that level writes into its own [`ReplicationStats`] through
//! [`Results::register`], which the replication driver calls for each event
//! *before* applying the event, so time-weighted integrals accrue over the
//! interval that ends at the event.

use std::collections::{BTreeSet, HashMap};

use qsim_core::{ClassId, Customer, Event, EventKind, ServerId, SimTime};
use serde::Serialize;
use tracing::trace;

use crate::configuration::{table_order, BusyConfiguration, ConfigurationOrdering};
use crate::estimate::{ConfidenceInterval, RunningMoments};

/// Read access to the occupancy of the system at an event instant.
pub trait OccupancyView {
    /// Customers in the system, waiting or in service.
    fn customers_present(&self) -> usize;

    /// Servers currently serving a customer.
    fn busy_servers(&self) -> usize;

    /// Busy servers in the scan order of the present-customer registry.
    fn busy_in_scan_order(&self) -> Vec<ServerId>;
}

/// Raw sums collected by a single replication.
#[derive(Debug, Clone)]
pub struct ReplicationStats {
    arrivals: Vec<u64>,
    departures: Vec<u64>,
    last_event: SimTime,
    sum_in_system: f64,
    sum_in_queue: f64,
    sum_sojourn: f64,
    sum_wait: Vec<f64>,
    waited: u64,
    configurations: Vec<HashMap<BusyConfiguration, u64>>,
}

impl ReplicationStats {
    pub fn new(nr_classes: usize) -> Self {
        Self {
            arrivals: vec![0; nr_classes],
            departures: vec![0; nr_classes],
            last_event: SimTime::zero(),
            sum_in_system: 0.0,
            sum_in_queue: 0.0,
            sum_sojourn: 0.0,
            sum_wait: vec![0.0; nr_classes],
            waited: 0,
            configurations: vec![HashMap::new(); nr_classes],
        }
    }

    pub fn arrivals(&self, class: ClassId) -> u64 {
        self.arrivals[class.0]
    }

    pub fn departures(&self, class: ClassId) -> u64 {
        self.departures[class.0]
    }

    pub fn total_arrivals(&self) -> u64 {
        self.arrivals.iter().sum()
    }

    pub fn total_departures(&self) -> u64 {
        self.departures.iter().sum()
    }

    /// Smallest departure count over all classes.
    pub fn min_departures(&self) -> u64 {
        self.departures.iter().copied().min().unwrap_or(0)
    }

    /// Time of the last registered event.
    pub fn elapsed(&self) -> SimTime {
        self.last_event
    }

    /// Time-average number of customers in the system.
    pub fn mean_in_system(&self) -> f64 {
        self.sum_in_system / self.last_event.as_f64()
    }

    /// Time-average number of waiting customers.
    pub fn mean_in_queue(&self) -> f64 {
        self.sum_in_queue / self.last_event.as_f64()
    }

    pub fn mean_sojourn(&self) -> f64 {
        self.sum_sojourn / self.total_departures() as f64
    }

    pub fn mean_wait_total(&self) -> f64 {
        self.sum_wait.iter().sum::<f64>() / self.total_departures() as f64
    }

    pub fn mean_wait(&self, class: ClassId) -> f64 {
        self.sum_wait[class.0] / self.departures[class.0] as f64
    }

    /// Fraction of departed customers that had to wait.
    pub fn wait_probability(&self) -> f64 {
        self.waited as f64 / self.total_departures() as f64
    }

    pub fn configuration_count(&self, class: ClassId, configuration: &BusyConfiguration) -> u64 {
        self.configurations[class.0]
            .get(configuration)
            .copied()
            .unwrap_or(0)
    }

    /// Fraction of class arrivals that found `configuration`; zero without arrivals.
    pub fn configuration_probability(
        &self,
        class: ClassId,
        configuration: &BusyConfiguration,
    ) -> f64 {
        match self.arrivals[class.0] {
            0 => 0.0,
            arrivals => self.configuration_count(class, configuration) as f64 / arrivals as f64,
        }
    }

    pub fn configurations(&self, class: ClassId) -> impl Iterator<Item = (&BusyConfiguration, &u64)> {
        self.configurations[class.0].iter()
    }
}

/// Aggregated results of every replication at one utilization level.
#[derive(Debug, Clone)]
pub struct Results {
    utilization: f64,
    nr_servers: usize,
    nr_classes: usize,
    ordering: ConfigurationOrdering,
    runs: Vec<ReplicationStats>,
}

impl Results {
    pub fn new(
        utilization: f64,
        nr_servers: usize,
        nr_classes: usize,
        runs: usize,
        ordering: ConfigurationOrdering,
    ) -> Self {
        Self {
            utilization,
            nr_servers,
            nr_classes,
            ordering,
            runs: (0..runs).map(|_| ReplicationStats::new(nr_classes)).collect(),
        }
    }

    pub fn utilization(&self) -> f64 {
        self.utilization
    }

    pub fn nr_servers(&self) -> usize {
        self.nr_servers
    }

    pub fn nr_classes(&self) -> usize {
        self.nr_classes
    }

    pub fn runs(&self) -> usize {
        self.runs.len()
    }

    pub fn replication(&self, run: usize) -> &ReplicationStats {
        &self.runs[run]
    }

    /// Smallest per-class departure count of replication `run`.
    pub fn departure_counter(&self, run: usize) -> u64 {
        self.runs[run].min_departures()
    }

    /// Record `event` for replication `run`.
    ///
    /// `customer` is the customer the event refers to and `view` the system state
    /// just before the event is applied. Departures must carry their final
    /// service start and departure time.
    pub fn register<V: OccupancyView + ?Sized>(
        &mut self,
        run: usize,
        event: &Event,
        customer: &Customer,
        view: &V,
    ) {
        let ordering = self.ordering;
        let stats = &mut self.runs[run];
        let present = view.customers_present();
        let busy = view.busy_servers();
        let interval = event.time.since(stats.last_event);

        stats.sum_in_system += present as f64 * interval;
        stats.sum_in_queue += present.saturating_sub(busy) as f64 * interval;

        let class = customer.class.0;
        match event.kind {
            EventKind::Arrival => {
                stats.arrivals[class] += 1;
                let configuration = BusyConfiguration::new(view.busy_in_scan_order(), ordering);
                trace!(run, class, %configuration, "Arrival observed configuration");
                *stats.configurations[class].entry(configuration).or_insert(0) += 1;
            }
            EventKind::Departure => {
                stats.departures[class] += 1;
                stats.sum_sojourn += customer.sojourn_time();
                stats.sum_wait[class] += customer.waiting_time();
                if customer.waited() {
                    stats.waited += 1;
                }
            }
        }

        stats.last_event = event.time;
    }

    /// Every configuration observed by any replication and class, in table order.
    ///
    /// Collection stops early once the theoretical maximum number of
    /// configurations has been seen.
    pub fn observed_configurations(&self) -> Vec<BusyConfiguration> {
        let limit = self.ordering.max_configurations(self.nr_servers);
        let mut seen: BTreeSet<&BusyConfiguration> = BTreeSet::new();
        'collect: for stats in &self.runs {
            for per_class in &stats.configurations {
                for configuration in per_class.keys() {
                    seen.insert(configuration);
                    if seen.len() as u64 >= limit {
                        break 'collect;
                    }
                }
            }
        }
        let mut table: Vec<BusyConfiguration> = seen.into_iter().cloned().collect();
        table.sort_by(table_order);
        table
    }

    /// Cross-replication means and 95% confidence intervals.
    pub fn summarize(&self) -> LevelSummary {
        let estimate = |metric: &dyn Fn(&ReplicationStats) -> f64| -> ConfidenceInterval {
            self.runs
                .iter()
                .map(metric)
                .collect::<RunningMoments>()
                .confidence_interval()
        };

        let classes: Vec<ClassId> = (0..self.nr_classes).map(ClassId).collect();
        let table = self.observed_configurations();

        let configurations = classes
            .iter()
            .map(|&class| ClassConfigurations {
                class,
                entries: table
                    .iter()
                    .map(|configuration| ConfigurationProbability {
                        configuration: configuration.clone(),
                        probability: estimate(&|stats: &ReplicationStats| {
                            stats.configuration_probability(class, configuration)
                        }),
                    })
                    .collect(),
            })
            .collect();

        LevelSummary {
            utilization: self.utilization,
            runs: self.runs.len(),
            in_system: estimate(&ReplicationStats::mean_in_system),
            in_queue: estimate(&ReplicationStats::mean_in_queue),
            sojourn: estimate(&ReplicationStats::mean_sojourn),
            wait_total: estimate(&ReplicationStats::mean_wait_total),
            wait_by_class: classes
                .iter()
                .map(|&class| estimate(&|stats: &ReplicationStats| stats.mean_wait(class)))
                .collect(),
            wait_probability: estimate(&ReplicationStats::wait_probability),
            configurations,
        }
    }
}

/// Configuration probabilities seen by arrivals of one class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassConfigurations {
    pub class: ClassId,
    pub entries: Vec<ConfigurationProbability>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigurationProbability {
    pub configuration: BusyConfiguration,
    pub probability: ConfidenceInterval,
}

/// Summary of one utilization level, ready for formatting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelSummary {
    pub utilization: f64,
    pub runs: usize,
    /// Time-average number of customers in the system.
    pub in_system: ConfidenceInterval,
    /// Time-average number of waiting customers.
    pub in_queue: ConfidenceInterval,
    pub sojourn: ConfidenceInterval,
    pub wait_total: ConfidenceInterval,
    pub wait_by_class: Vec<ConfidenceInterval>,
    pub wait_probability: ConfidenceInterval,
    pub configurations: Vec<ClassConfigurations>,
}
