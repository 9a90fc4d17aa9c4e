//! Busy-server configurations observed at arrival instants
//!
//! A configuration lists the servers that are busy when a customer arrives. By
//! default the list follows the order of the present-customer registry (the
//! arrival order of the customers being served), so `[1, 0]` and `[0, 1]` are
//! different configurations. [`ConfigurationOrdering::ServerId`] sorts the ids
//! instead, which counts each set of busy servers once.

use std::fmt;

use qsim_core::ServerId;
use serde::{Deserialize, Serialize};

use crate::estimate::factorial;

/// How busy servers are ordered inside a [`BusyConfiguration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConfigurationOrdering {
    /// Order in which the customers being served arrived.
    #[default]
    ArrivalOrder,
    /// Ascending server id; configurations behave as sets.
    ServerId,
}

impl ConfigurationOrdering {
    /// Upper bound on the number of distinct configurations with `nr_servers` servers.
    ///
    /// For arrival order this is the number of ordered selections of any size,
    /// `Σ_{k=0}^{n} n!/k! = 2·n! + n!·Σ_{k=2}^{n} 1/k!`. For server-id order it is
    /// the number of subsets, `2^n`. Both saturate at `u64::MAX`.
    pub fn max_configurations(&self, nr_servers: usize) -> u64 {
        let n = u32::try_from(nr_servers).unwrap_or(u32::MAX);
        match self {
            ConfigurationOrdering::ArrivalOrder => {
                let n_factorial = factorial(n);
                (0..=n).fold(0u64, |acc, k| acc.saturating_add(n_factorial / factorial(k)))
            }
            ConfigurationOrdering::ServerId => 1u64.checked_shl(n).unwrap_or(u64::MAX),
        }
    }
}

/// Busy servers at one arrival instant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BusyConfiguration(Vec<ServerId>);

impl BusyConfiguration {
    /// Build a configuration from servers listed in registry scan order.
    pub fn new(mut servers: Vec<ServerId>, ordering: ConfigurationOrdering) -> Self {
        if ordering == ConfigurationOrdering::ServerId {
            servers.sort_unstable();
        }
        Self(servers)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn servers(&self) -> &[ServerId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Orders configurations by size first, then lexicographically.
pub(crate) fn table_order(a: &BusyConfiguration, b: &BusyConfiguration) -> std::cmp::Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl fmt::Display for BusyConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("-");
        }
        let ids: Vec<String> = self.0.iter().map(|s| s.0.to_string()).collect();
        f.write_str(&ids.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_configurations_arrival_order() {
        let ordering = ConfigurationOrdering::ArrivalOrder;
        assert_eq!(ordering.max_configurations(1), 2);
        assert_eq!(ordering.max_configurations(2), 5);
        assert_eq!(ordering.max_configurations(3), 16);
        assert_eq!(ordering.max_configurations(4), 65);
    }

    #[test]
    fn test_max_configurations_matches_closed_form() {
        for n in 2..=8u32 {
            let n_factorial = factorial(n) as f64;
            let tail: f64 = (2..=n).map(|k| 1.0 / factorial(k) as f64).sum();
            let closed_form = (2.0 * n_factorial + n_factorial * tail).round() as u64;
            assert_eq!(
                ConfigurationOrdering::ArrivalOrder.max_configurations(n as usize),
                closed_form
            );
        }
    }

    #[test]
    fn test_max_configurations_server_id() {
        let ordering = ConfigurationOrdering::ServerId;
        assert_eq!(ordering.max_configurations(0), 1);
        assert_eq!(ordering.max_configurations(3), 8);
    }

    #[test]
    fn test_ordering_keys() {
        let scan = vec![ServerId(2), ServerId(0)];
        let ordered = BusyConfiguration::new(scan.clone(), ConfigurationOrdering::ArrivalOrder);
        let sorted = BusyConfiguration::new(scan, ConfigurationOrdering::ServerId);
        assert_eq!(ordered.servers(), &[ServerId(2), ServerId(0)]);
        assert_eq!(sorted.servers(), &[ServerId(0), ServerId(2)]);
        assert_ne!(ordered, sorted);
        assert_eq!(format!("{ordered}"), "2 0");
        assert_eq!(format!("{}", BusyConfiguration::empty()), "-");
    }

    #[test]
    fn test_table_order() {
        let mut table = vec![
            BusyConfiguration::new(vec![ServerId(1), ServerId(0)], ConfigurationOrdering::ArrivalOrder),
            BusyConfiguration::new(vec![ServerId(1)], ConfigurationOrdering::ArrivalOrder),
            BusyConfiguration::empty(),
            BusyConfiguration::new(vec![ServerId(0)], ConfigurationOrdering::ArrivalOrder),
        ];
        table.sort_by(table_order);
        let rendered: Vec<String> = table.iter().map(|c| c.to_string()).collect();
        assert_eq!(rendered, vec!["-", "0", "1", "1 0"]);
    }
}
