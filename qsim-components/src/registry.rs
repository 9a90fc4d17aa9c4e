//! Matching registries of one replication
//!
//! [`IdleServerRegistry`] keeps idle servers in the order they became idle and
//! [`CustomerRegistry`] keeps present customers in arrival order. Both matching
//! operations are first-fit scans in that order, so the longest-idle eligible
//! server and the longest-waiting eligible customer are always chosen.

use std::collections::VecDeque;

use qsim_core::{ClassId, Customer, CustomerId, Server, ServerId, SimTime};
use qsim_metrics::OccupancyView;

/// Servers of a replication and the subset that is currently idle.
#[derive(Debug, Clone)]
pub struct IdleServerRegistry {
    servers: Vec<Server>,
    idle: VecDeque<ServerId>,
}

impl IdleServerRegistry {
    /// All servers start idle, in id order.
    pub fn new(servers: Vec<Server>) -> Self {
        let idle = servers.iter().map(|s| s.id).collect();
        Self { servers, idle }
    }

    /// First idle server, in idle order, that may serve `class`.
    pub fn find_eligible(&self, class: ClassId) -> Option<ServerId> {
        self.idle
            .iter()
            .copied()
            .find(|&id| self.servers[id.0].serves(class))
    }

    /// Mark `server` busy. Returns false if it was not idle.
    pub fn remove(&mut self, server: ServerId) -> bool {
        match self.idle.iter().position(|&id| id == server) {
            Some(index) => {
                self.idle.remove(index);
                true
            }
            None => false,
        }
    }

    /// Mark `server` idle again, behind every server that is already idle.
    pub fn add(&mut self, server: ServerId) {
        debug_assert!(!self.idle.contains(&server), "{server} is already idle");
        self.idle.push_back(server);
    }

    /// Number of idle servers.
    pub fn len(&self) -> usize {
        self.idle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idle.is_empty()
    }

    pub fn busy(&self) -> usize {
        self.servers.len() - self.idle.len()
    }

    pub fn nr_servers(&self) -> usize {
        self.servers.len()
    }

    pub fn server(&self, id: ServerId) -> &Server {
        &self.servers[id.0]
    }

    pub fn is_idle(&self, server: ServerId) -> bool {
        self.idle.contains(&server)
    }

    /// Idle servers in the order they became idle.
    pub fn idle(&self) -> impl Iterator<Item = ServerId> + '_ {
        self.idle.iter().copied()
    }
}

/// Arena of the customers of one replication plus the present ones in arrival order.
///
/// A customer is *admitted* when its arrival is scheduled and becomes *present*
/// when the arrival is processed. Slots are recycled once a customer checks out,
/// so the arena only grows with the number of customers alive at once.
#[derive(Debug, Clone, Default)]
pub struct CustomerRegistry {
    slots: Vec<Option<Customer>>,
    free: Vec<CustomerId>,
    present: VecDeque<CustomerId>,
}

impl CustomerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a not-yet-present customer of `class`.
    pub fn admit(&mut self, class: ClassId) -> CustomerId {
        let customer = Some(Customer::new(class));
        match self.free.pop() {
            Some(id) => {
                self.slots[id.0] = customer;
                id
            }
            None => {
                self.slots.push(customer);
                CustomerId(self.slots.len() - 1)
            }
        }
    }

    /// Make `id` present from `time` on, behind every present customer.
    pub fn check_in(&mut self, id: CustomerId, time: SimTime) -> Option<()> {
        let customer = self.get_mut(id)?;
        customer.arrival_time = time;
        self.present.push_back(id);
        Some(())
    }

    /// Remove `id` from the system and free its slot.
    pub fn check_out(&mut self, id: CustomerId) -> Option<Customer> {
        let index = self.present.iter().position(|&c| c == id)?;
        self.present.remove(index);
        let customer = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id);
        Some(customer)
    }

    /// Start serving `id` on `server` at `time`.
    pub fn bind(&mut self, id: CustomerId, server: ServerId, time: SimTime) -> Option<()> {
        let customer = self.get_mut(id)?;
        customer.server = Some(server);
        customer.service_start = Some(time);
        Some(())
    }

    /// First present customer, in arrival order, waiting and eligible for `server`.
    pub fn find_waiting_eligible(&self, server: &Server) -> Option<CustomerId> {
        self.present.iter().copied().find(|&id| {
            self.get(id)
                .is_some_and(|c| c.is_waiting() && server.serves(c.class))
        })
    }

    pub fn get(&self, id: CustomerId) -> Option<&Customer> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: CustomerId) -> Option<&mut Customer> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Number of present customers.
    pub fn len(&self) -> usize {
        self.present.len()
    }

    pub fn is_empty(&self) -> bool {
        self.present.is_empty()
    }

    /// Present customers in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (CustomerId, &Customer)> + '_ {
        self.present
            .iter()
            .filter_map(move |&id| self.get(id).map(|c| (id, c)))
    }

    /// Present customers of `class`.
    pub fn count_class(&self, class: ClassId) -> usize {
        self.iter().filter(|(_, c)| c.class == class).count()
    }

    /// Customers in service.
    pub fn in_service(&self) -> usize {
        self.iter().filter(|(_, c)| !c.is_waiting()).count()
    }

    /// Allocated arena slots, alive or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

/// Occupancy of a replication as seen by the result aggregator.
pub struct SystemView<'a> {
    pub customers: &'a CustomerRegistry,
    pub servers: &'a IdleServerRegistry,
}

impl OccupancyView for SystemView<'_> {
    fn customers_present(&self) -> usize {
        self.customers.len()
    }

    fn busy_servers(&self) -> usize {
        self.servers.busy()
    }

    fn busy_in_scan_order(&self) -> Vec<ServerId> {
        let busy = self.servers.busy();
        let mut configuration = Vec::with_capacity(busy);
        for (_, customer) in self.customers.iter() {
            if configuration.len() == busy {
                break;
            }
            if let Some(server) = customer.server {
                configuration.push(server);
            }
        }
        configuration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn servers(rows: &[&[bool]]) -> Vec<Server> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| Server::new(ServerId(i), row.to_vec()))
            .collect()
    }

    #[test]
    fn test_idle_servers_fifo() {
        let mut registry = IdleServerRegistry::new(servers(&[&[true, false], &[true, true], &[false, true]]));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.busy(), 0);
        assert_eq!(registry.find_eligible(ClassId(1)), Some(ServerId(1)));

        assert!(registry.remove(ServerId(1)));
        assert!(!registry.remove(ServerId(1)));
        assert_eq!(registry.busy(), 1);
        assert_eq!(registry.find_eligible(ClassId(1)), Some(ServerId(2)));

        // Returning servers queue behind the ones already idle.
        assert!(registry.remove(ServerId(2)));
        registry.add(ServerId(1));
        registry.add(ServerId(2));
        assert_eq!(registry.find_eligible(ClassId(1)), Some(ServerId(1)));
        assert_eq!(registry.idle().collect::<Vec<_>>(), vec![ServerId(0), ServerId(1), ServerId(2)]);
    }

    #[test]
    fn test_no_eligible_idle_server() {
        let mut registry = IdleServerRegistry::new(servers(&[&[true, false]]));
        assert_eq!(registry.find_eligible(ClassId(1)), None);
        registry.remove(ServerId(0));
        assert_eq!(registry.find_eligible(ClassId(0)), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_customer_lifecycle() {
        let mut registry = CustomerRegistry::new();
        let a = registry.admit(ClassId(0));
        assert!(registry.is_empty());

        registry.check_in(a, SimTime::new(1.0)).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get(a).unwrap().is_waiting());

        registry.bind(a, ServerId(3), SimTime::new(2.0)).unwrap();
        let customer = registry.get(a).unwrap();
        assert_eq!(customer.server, Some(ServerId(3)));
        assert_eq!(customer.service_start, Some(SimTime::new(2.0)));

        let left = registry.check_out(a).unwrap();
        assert_eq!(left.arrival_time, SimTime::new(1.0));
        assert!(registry.is_empty());
        assert!(registry.get(a).is_none());
        assert!(registry.check_out(a).is_none());
    }

    #[test]
    fn test_slots_are_reused() {
        let mut registry = CustomerRegistry::new();
        for round in 0..100 {
            let id = registry.admit(ClassId(0));
            registry.check_in(id, SimTime::new(round as f64)).unwrap();
            registry.check_out(id).unwrap();
        }
        assert_eq!(registry.capacity(), 1);
    }

    #[test]
    fn test_waiting_customer_scan() {
        let server = Server::new(ServerId(0), vec![false, true]);
        let mut registry = CustomerRegistry::new();
        let ids: Vec<CustomerId> = [0, 1, 1]
            .iter()
            .enumerate()
            .map(|(t, &class)| {
                let id = registry.admit(ClassId(class));
                registry.check_in(id, SimTime::new(t as f64)).unwrap();
                id
            })
            .collect();

        assert_eq!(registry.find_waiting_eligible(&server), Some(ids[1]));
        registry.bind(ids[1], ServerId(1), SimTime::new(3.0)).unwrap();
        assert_eq!(registry.find_waiting_eligible(&server), Some(ids[2]));
        assert_eq!(registry.count_class(ClassId(1)), 2);
        assert_eq!(registry.in_service(), 1);
    }

    #[test]
    fn test_view_lists_busy_servers_in_arrival_order() {
        let mut servers = IdleServerRegistry::new(servers(&[&[true], &[true], &[true]]));
        let mut customers = CustomerRegistry::new();
        let ids: Vec<CustomerId> = (0..3)
            .map(|t| {
                let id = customers.admit(ClassId(0));
                customers.check_in(id, SimTime::new(t as f64)).unwrap();
                id
            })
            .collect();
        customers.bind(ids[0], ServerId(2), SimTime::new(0.0)).unwrap();
        customers.bind(ids[1], ServerId(0), SimTime::new(1.0)).unwrap();
        servers.remove(ServerId(2));
        servers.remove(ServerId(0));

        let view = SystemView { customers: &customers, servers: &servers };
        assert_eq!(view.customers_present(), 3);
        assert_eq!(view.busy_servers(), 2);
        assert_eq!(view.busy_in_scan_order(), vec![ServerId(2), ServerId(0)]);
    }
}
