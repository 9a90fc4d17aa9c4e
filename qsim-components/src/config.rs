//! Simulation configuration and validation
//!
//! A [`SimulationConfig`] is assembled through [`SimulationConfigBuilder`] and is
//! fully validated by [`SimulationConfigBuilder::build`], so every later stage can
//! assume a well-formed eligibility matrix and usable parameters.
//!
//! Parameter files are read by an external collaborator. It can feed each
//! `Key=Value` line to [`ServerParameters::apply_line`] or
//! [`ClassParameters::apply_line`], which dispatch on [`ParameterKey`].
//!
//! # Example
//!
//! ```rust
//! use qsim_components::config::{Eligibility, ServerParameters, SimulationConfig};
//!
//! let config = SimulationConfig::builder(Eligibility::dense(2, 1))
//!     .server(0, ServerParameters::exponential(1.0))
//!     .server(1, ServerParameters::exponential(2.0))
//!     .runs(4)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.nr_servers(), 2);
//! assert_eq!(config.total_service_rate(), 1.5);
//! ```

use std::fmt;
use std::str::FromStr;

use qsim_core::{ClassId, ConfigError, Family, Server, ServerId, VariateGenerator};
use qsim_metrics::ConfigurationOrdering;
use serde::{Deserialize, Serialize};

/// Largest accepted deviation of the class fractions from 1.
pub const FRACTION_TOLERANCE: f64 = 1e-9;

/// Largest accepted utilization step.
pub const MAX_STEP_SIZE: f64 = 0.9;

/// Helper for validating numeric ranges
pub fn validate_range<T: PartialOrd + fmt::Display>(
    field: &str,
    value: T,
    min: T,
    max: T,
) -> Result<(), ConfigError> {
    if value < min || value > max {
        Err(ConfigError::ConstraintViolation {
            field: field.to_string(),
            constraint: format!("between {min} and {max}"),
        })
    } else {
        Ok(())
    }
}

/// Helper for validating that a value is positive
pub fn validate_positive<T: PartialOrd + Default + fmt::Display>(
    field: &str,
    value: T,
) -> Result<(), ConfigError> {
    // NaN fails the comparison and is rejected too.
    if value > T::default() {
        Ok(())
    } else {
        Err(ConfigError::ConstraintViolation {
            field: field.to_string(),
            constraint: "positive".to_string(),
        })
    }
}

/// Helper for validating that a float is finite
pub fn validate_finite(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("{value} is not a finite number"),
        })
    }
}

/// Boolean matrix indexed `[server][class]`: may the server serve the class?
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<bool>>", into = "Vec<Vec<bool>>")]
pub struct Eligibility {
    rows: Vec<Vec<bool>>,
}

impl Eligibility {
    /// Validate and wrap a `[server][class]` matrix.
    ///
    /// The matrix must be rectangular and non-empty, every class must be
    /// eligible for some server and every server must serve some class.
    pub fn new(rows: Vec<Vec<bool>>) -> Result<Self, ConfigError> {
        let nr_classes = rows.first().map_or(0, Vec::len);
        if rows.is_empty() || nr_classes == 0 {
            return Err(ConfigError::MalformedEligibility(
                "at least one server and one class are required".to_string(),
            ));
        }
        if let Some(server) = rows.iter().position(|row| row.len() != nr_classes) {
            return Err(ConfigError::MalformedEligibility(format!(
                "row of server {server} has {} entries, expected {nr_classes}",
                rows[server].len()
            )));
        }
        if let Some(server) = rows.iter().position(|row| !row.iter().any(|&e| e)) {
            return Err(ConfigError::MalformedEligibility(format!(
                "server {server} serves no class"
            )));
        }
        if let Some(class) = (0..nr_classes).find(|&class| !rows.iter().any(|row| row[class])) {
            return Err(ConfigError::MalformedEligibility(format!(
                "class {class} has no eligible server"
            )));
        }
        Ok(Self { rows })
    }

    /// Every server may serve every class.
    ///
    /// A zero count is raised to one, so the matrix is never empty.
    pub fn dense(nr_servers: usize, nr_classes: usize) -> Self {
        Self {
            rows: vec![vec![true; nr_classes.max(1)]; nr_servers.max(1)],
        }
    }

    /// Server `i` serves class `i` only. `dedicated(0)` is the 1×1 matrix.
    pub fn dedicated(n: usize) -> Self {
        let n = n.max(1);
        Self {
            rows: (0..n).map(|s| (0..n).map(|c| s == c).collect()).collect(),
        }
    }

    pub fn nr_servers(&self) -> usize {
        self.rows.len()
    }

    pub fn nr_classes(&self) -> usize {
        self.rows[0].len()
    }

    pub fn is_eligible(&self, server: ServerId, class: ClassId) -> bool {
        self.rows[server.0][class.0]
    }

    /// Servers eligible for `class`, in id order.
    pub fn servers_for(&self, class: ClassId) -> impl Iterator<Item = ServerId> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter(move |(_, row)| row[class.0])
            .map(|(s, _)| ServerId(s))
    }

    /// Whether every server eligible for `inner` is also eligible for `outer`.
    pub fn is_subset(&self, inner: ClassId, outer: ClassId) -> bool {
        self.rows.iter().all(|row| !row[inner.0] || row[outer.0])
    }

    /// Fresh server records for one replication.
    pub fn build_servers(&self) -> Vec<Server> {
        self.rows
            .iter()
            .enumerate()
            .map(|(s, row)| Server::new(ServerId(s), row.clone()))
            .collect()
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }
}

impl TryFrom<Vec<Vec<bool>>> for Eligibility {
    type Error = ConfigError;

    fn try_from(rows: Vec<Vec<bool>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<Eligibility> for Vec<Vec<bool>> {
    fn from(eligibility: Eligibility) -> Self {
        eligibility.rows
    }
}

/// Name of a settable parameter in a server or class parameter file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKey {
    Type,
    Average,
    Cv,
    Fraction,
}

impl ParameterKey {
    pub fn name(&self) -> &'static str {
        match self {
            ParameterKey::Type => "Type",
            ParameterKey::Average => "Average",
            ParameterKey::Cv => "CV",
            ParameterKey::Fraction => "Fraction",
        }
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParameterKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Type" => Ok(ParameterKey::Type),
            "Average" => Ok(ParameterKey::Average),
            "CV" => Ok(ParameterKey::Cv),
            "Fraction" => Ok(ParameterKey::Fraction),
            other => Err(ConfigError::UnknownParameter(other.to_string())),
        }
    }
}

fn parse_number(key: ParameterKey, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::UnparsableValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

fn split_line(line: &str) -> Result<(ParameterKey, &str), ConfigError> {
    let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::UnparsableValue {
        key: line.trim().to_string(),
        value: String::new(),
    })?;
    Ok((key.parse()?, value))
}

/// Service-time parameters of one server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerParameters {
    pub family: Family,
    pub mean: f64,
    pub cv: f64,
}

impl Default for ServerParameters {
    fn default() -> Self {
        Self {
            family: Family::Exponential,
            mean: 1.0,
            cv: 1.0,
        }
    }
}

impl ServerParameters {
    pub fn new(family: Family, mean: f64, cv: f64) -> Self {
        Self { family, mean, cv }
    }

    pub fn exponential(mean: f64) -> Self {
        Self::new(Family::Exponential, mean, 1.0)
    }

    /// Set one parameter from its textual value.
    pub fn set(&mut self, key: ParameterKey, value: &str) -> Result<(), ConfigError> {
        match key {
            ParameterKey::Type => self.family = value.parse()?,
            ParameterKey::Average => self.mean = parse_number(key, value)?,
            ParameterKey::Cv => self.cv = parse_number(key, value)?,
            ParameterKey::Fraction => return Err(ConfigError::UnknownParameter(key.to_string())),
        }
        Ok(())
    }

    /// Apply a `Key=Value` line. Blank lines are ignored.
    pub fn apply_line(&mut self, line: &str) -> Result<(), ConfigError> {
        if line.trim().is_empty() {
            return Ok(());
        }
        let (key, value) = split_line(line)?;
        self.set(key, value)
    }

    /// Service rate `1/mean`.
    pub fn rate(&self) -> f64 {
        1.0 / self.mean
    }

    pub fn generator(&self) -> Result<VariateGenerator, ConfigError> {
        VariateGenerator::new(self.family, self.mean, self.cv)
    }
}

/// Arrival parameters of one customer class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassParameters {
    /// Share of the total arrival rate.
    pub fraction: f64,
}

impl Default for ClassParameters {
    fn default() -> Self {
        Self { fraction: 1.0 }
    }
}

impl ClassParameters {
    pub fn new(fraction: f64) -> Self {
        Self { fraction }
    }

    pub fn set(&mut self, key: ParameterKey, value: &str) -> Result<(), ConfigError> {
        match key {
            ParameterKey::Fraction => self.fraction = parse_number(key, value)?,
            other => return Err(ConfigError::UnknownParameter(other.to_string())),
        }
        Ok(())
    }

    /// Apply a `Key=Value` line. Blank lines are ignored.
    pub fn apply_line(&mut self, line: &str) -> Result<(), ConfigError> {
        if line.trim().is_empty() {
            return Ok(());
        }
        let (key, value) = split_line(line)?;
        self.set(key, value)
    }
}

/// Validated configuration of a utilization sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConfigDocument")]
pub struct SimulationConfig {
    eligibility: Eligibility,
    servers: Vec<ServerParameters>,
    classes: Vec<ClassParameters>,
    runs: usize,
    step_size: f64,
    threads: usize,
    departures_to_simulate: f64,
    seed: Option<u64>,
    configuration_ordering: ConfigurationOrdering,
}

impl SimulationConfig {
    /// Start a builder with default parameters for every server and class.
    pub fn builder(eligibility: Eligibility) -> SimulationConfigBuilder {
        SimulationConfigBuilder::new(eligibility)
    }

    pub fn eligibility(&self) -> &Eligibility {
        &self.eligibility
    }

    pub fn nr_servers(&self) -> usize {
        self.eligibility.nr_servers()
    }

    pub fn nr_classes(&self) -> usize {
        self.eligibility.nr_classes()
    }

    pub fn servers(&self) -> &[ServerParameters] {
        &self.servers
    }

    pub fn classes(&self) -> &[ClassParameters] {
        &self.classes
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn departures_to_simulate(&self) -> f64 {
        self.departures_to_simulate
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn configuration_ordering(&self) -> ConfigurationOrdering {
        self.configuration_ordering
    }

    /// Sum of the service rates of all servers.
    pub fn total_service_rate(&self) -> f64 {
        self.servers.iter().map(ServerParameters::rate).sum()
    }

    /// Total arrival rate that loads the system to `utilization`.
    pub fn arrival_rate(&self, utilization: f64) -> f64 {
        utilization * self.total_service_rate()
    }

    /// Service-time generators, one per server.
    pub fn service_generators(&self) -> Result<Vec<VariateGenerator>, ConfigError> {
        self.servers.iter().map(ServerParameters::generator).collect()
    }

    /// Poisson inter-arrival generators, one per class, at `utilization`.
    pub fn arrival_generators(&self, utilization: f64) -> Result<Vec<VariateGenerator>, ConfigError> {
        let lambda = self.arrival_rate(utilization);
        self.classes
            .iter()
            .map(|class| VariateGenerator::exponential_with_rate(class.fraction * lambda))
            .collect()
    }
}

/// Serialized form of a configuration; missing parameters take their defaults.
#[derive(Deserialize)]
struct ConfigDocument {
    eligibility: Eligibility,
    #[serde(default)]
    servers: Option<Vec<ServerParameters>>,
    #[serde(default)]
    classes: Option<Vec<ClassParameters>>,
    #[serde(default)]
    runs: Option<usize>,
    #[serde(default)]
    step_size: Option<f64>,
    #[serde(default)]
    threads: Option<usize>,
    #[serde(default)]
    departures_to_simulate: Option<f64>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    configuration_ordering: ConfigurationOrdering,
}

impl TryFrom<ConfigDocument> for SimulationConfig {
    type Error = ConfigError;

    fn try_from(document: ConfigDocument) -> Result<Self, Self::Error> {
        let mut builder = SimulationConfig::builder(document.eligibility)
            .seed(document.seed)
            .configuration_ordering(document.configuration_ordering);
        if let Some(servers) = document.servers {
            builder = builder.servers(servers);
        }
        if let Some(classes) = document.classes {
            builder = builder.classes(classes);
        }
        if let Some(runs) = document.runs {
            builder = builder.runs(runs);
        }
        if let Some(step_size) = document.step_size {
            builder = builder.step_size(step_size);
        }
        if let Some(threads) = document.threads {
            builder = builder.threads(threads);
        }
        if let Some(departures) = document.departures_to_simulate {
            builder = builder.departures_to_simulate(departures);
        }
        builder.build()
    }
}

/// Builder for [`SimulationConfig`]
#[derive(Debug, Clone)]
pub struct SimulationConfigBuilder {
    eligibility: Eligibility,
    servers: Vec<ServerParameters>,
    classes: Vec<ClassParameters>,
    runs: usize,
    step_size: f64,
    threads: usize,
    departures_to_simulate: f64,
    seed: Option<u64>,
    configuration_ordering: ConfigurationOrdering,
}

impl SimulationConfigBuilder {
    pub fn new(eligibility: Eligibility) -> Self {
        let nr_servers = eligibility.nr_servers();
        let nr_classes = eligibility.nr_classes();
        Self {
            eligibility,
            servers: vec![ServerParameters::default(); nr_servers],
            classes: vec![ClassParameters::default(); nr_classes],
            runs: 1,
            step_size: 0.05,
            threads: 1,
            departures_to_simulate: 1e6,
            seed: None,
            configuration_ordering: ConfigurationOrdering::default(),
        }
    }

    /// Replace the parameters of every server.
    pub fn servers(mut self, servers: Vec<ServerParameters>) -> Self {
        self.servers = servers;
        self
    }

    /// Set the parameters of server `index`. Out-of-range indices are ignored.
    pub fn server(mut self, index: usize, parameters: ServerParameters) -> Self {
        if let Some(slot) = self.servers.get_mut(index) {
            *slot = parameters;
        }
        self
    }

    /// Replace the parameters of every class.
    pub fn classes(mut self, classes: Vec<ClassParameters>) -> Self {
        self.classes = classes;
        self
    }

    /// Set the arrival fraction of every class, in class order.
    pub fn fractions(mut self, fractions: &[f64]) -> Self {
        self.classes = fractions.iter().map(|&f| ClassParameters::new(f)).collect();
        self
    }

    pub fn runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    pub fn step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn departures_to_simulate(mut self, departures: f64) -> Self {
        self.departures_to_simulate = departures;
        self
    }

    pub fn seed(mut self, seed: impl Into<Option<u64>>) -> Self {
        self.seed = seed.into();
        self
    }

    pub fn configuration_ordering(mut self, ordering: ConfigurationOrdering) -> Self {
        self.configuration_ordering = ordering;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.servers.len() != self.eligibility.nr_servers() {
            return Err(ConfigError::ParameterCount {
                what: "server",
                expected: self.eligibility.nr_servers(),
                actual: self.servers.len(),
            });
        }
        if self.classes.len() != self.eligibility.nr_classes() {
            return Err(ConfigError::ParameterCount {
                what: "class",
                expected: self.eligibility.nr_classes(),
                actual: self.classes.len(),
            });
        }

        for (i, server) in self.servers.iter().enumerate() {
            validate_finite(&format!("server {i} mean"), server.mean)?;
            validate_positive(&format!("server {i} mean"), server.mean)?;
            server.generator()?;
        }

        for (i, class) in self.classes.iter().enumerate() {
            validate_finite(&format!("class {i} fraction"), class.fraction)?;
            validate_positive(&format!("class {i} fraction"), class.fraction)?;
        }
        let sum: f64 = self.classes.iter().map(|c| c.fraction).sum();
        if (sum - 1.0).abs() > FRACTION_TOLERANCE {
            return Err(ConfigError::FractionSum { sum });
        }

        validate_positive("runs", self.runs)?;
        validate_positive("threads", self.threads)?;
        validate_finite("step_size", self.step_size)?;
        validate_positive("step_size", self.step_size)?;
        validate_range("step_size", self.step_size, 0.0, MAX_STEP_SIZE)?;
        validate_finite("departures_to_simulate", self.departures_to_simulate)?;
        validate_positive("departures_to_simulate", self.departures_to_simulate)?;
        Ok(())
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        self.validate()?;
        Ok(SimulationConfig {
            eligibility: self.eligibility,
            servers: self.servers,
            classes: self.classes,
            runs: self.runs,
            step_size: self.step_size,
            threads: self.threads,
            departures_to_simulate: self.departures_to_simulate,
            seed: self.seed,
            configuration_ordering: self.configuration_ordering,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_range() {
        assert!(validate_range("test", 5, 0, 10).is_ok());
        assert!(validate_range("test", 0, 0, 10).is_ok());
        assert!(validate_range("test", 10, 0, 10).is_ok());
        assert!(validate_range("test", -1, 0, 10).is_err());
        assert!(validate_range("test", 11, 0, 10).is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("test", 1).is_ok());
        assert!(validate_positive("test", 0).is_err());
        assert!(validate_positive("test", -1).is_err());
        assert!(validate_positive("test", f64::NAN).is_err());
    }

    #[test]
    fn test_eligibility_validation() {
        assert!(Eligibility::new(vec![]).is_err());
        assert!(Eligibility::new(vec![vec![]]).is_err());
        assert!(matches!(
            Eligibility::new(vec![vec![true, false], vec![true]]),
            Err(ConfigError::MalformedEligibility(_))
        ));
        // Server 1 serves nothing.
        assert!(Eligibility::new(vec![vec![true, true], vec![false, false]]).is_err());
        // Class 1 has no server.
        assert!(Eligibility::new(vec![vec![true, false], vec![true, false]]).is_err());

        let n_system = Eligibility::new(vec![vec![true, true], vec![false, true]]).unwrap();
        assert_eq!(n_system.nr_servers(), 2);
        assert_eq!(n_system.nr_classes(), 2);
        assert!(n_system.is_subset(ClassId(0), ClassId(1)));
        assert!(!n_system.is_subset(ClassId(1), ClassId(0)));
        assert_eq!(
            n_system.servers_for(ClassId(1)).collect::<Vec<_>>(),
            vec![ServerId(0), ServerId(1)]
        );
    }

    #[test]
    fn test_zero_sized_shortcuts_clamp_to_one() {
        let dense = Eligibility::dense(0, 0);
        assert_eq!((dense.nr_servers(), dense.nr_classes()), (1, 1));
        assert_eq!(Eligibility::new(dense.rows().to_vec()).unwrap(), dense);

        let dedicated = Eligibility::dedicated(0);
        assert_eq!((dedicated.nr_servers(), dedicated.nr_classes()), (1, 1));
        assert!(dedicated.is_eligible(ServerId(0), ClassId(0)));
    }

    #[test]
    fn test_eligibility_deserialize_validates() {
        let ok: Eligibility = serde_json::from_str("[[true,false],[false,true]]").unwrap();
        assert_eq!(ok, Eligibility::dedicated(2));
        assert!(serde_json::from_str::<Eligibility>("[[true,false],[true,false]]").is_err());
    }

    #[test]
    fn test_config_document_is_validated() {
        let config: SimulationConfig = serde_json::from_str(
            r#"{"eligibility": [[true], [true]], "runs": 3, "seed": 9,
                "servers": [{"family": "Exponential", "mean": 2.0}, {}]}"#,
        )
        .unwrap();
        assert_eq!(config.runs(), 3);
        assert_eq!(config.seed(), Some(9));
        assert_eq!(config.servers()[0].mean, 2.0);
        assert_eq!(config.servers()[1], ServerParameters::default());

        let round_trip: SimulationConfig =
            serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(round_trip, config);

        let bad = r#"{"eligibility": [[true]], "classes": [{"fraction": 0.5}]}"#;
        assert!(serde_json::from_str::<SimulationConfig>(bad).is_err());
    }

    #[test]
    fn test_parameter_keys() {
        assert_eq!("Type".parse::<ParameterKey>().unwrap(), ParameterKey::Type);
        assert_eq!("CV".parse::<ParameterKey>().unwrap(), ParameterKey::Cv);
        assert!(matches!(
            "Speed".parse::<ParameterKey>(),
            Err(ConfigError::UnknownParameter(_))
        ));
    }

    #[test]
    fn test_server_parameter_lines() {
        let mut server = ServerParameters::default();
        server.apply_line("Type=HyperExponential2").unwrap();
        server.apply_line("Average=2.5").unwrap();
        server.apply_line("CV=4").unwrap();
        server.apply_line("").unwrap();
        assert_eq!(server, ServerParameters::new(Family::HyperExponential2, 2.5, 4.0));

        assert!(matches!(
            server.apply_line("Type=Gamma"),
            Err(ConfigError::UnknownFamily(_))
        ));
        assert!(matches!(
            server.apply_line("Average=fast"),
            Err(ConfigError::UnparsableValue { .. })
        ));
        assert!(server.apply_line("Fraction=0.5").is_err());
    }

    #[test]
    fn test_class_parameter_lines() {
        let mut class = ClassParameters::default();
        class.apply_line("Fraction=0.25").unwrap();
        assert_eq!(class.fraction, 0.25);
        assert!(class.apply_line("Average=1").is_err());
    }

    #[test]
    fn test_builder_defaults() {
        let config = SimulationConfig::builder(Eligibility::dense(1, 1)).build().unwrap();
        assert_eq!(config.runs(), 1);
        assert_eq!(config.threads(), 1);
        assert_eq!(config.step_size(), 0.05);
        assert_eq!(config.departures_to_simulate(), 1e6);
        assert_eq!(config.seed(), None);
        assert_eq!(config.configuration_ordering(), ConfigurationOrdering::ArrivalOrder);
        assert_eq!(config.servers()[0], ServerParameters::default());
    }

    #[test]
    fn test_builder_rejects_invalid_values() {
        let base = || SimulationConfig::builder(Eligibility::dense(2, 2)).fractions(&[0.5, 0.5]);

        assert!(base().build().is_ok());
        assert!(matches!(
            base().fractions(&[0.5, 0.6]).build(),
            Err(ConfigError::FractionSum { .. })
        ));
        assert!(base().fractions(&[1.0, 0.0]).build().is_err());
        assert!(matches!(
            base().fractions(&[1.0]).build(),
            Err(ConfigError::ParameterCount { what: "class", .. })
        ));
        assert!(matches!(
            base().servers(vec![ServerParameters::default()]).build(),
            Err(ConfigError::ParameterCount { what: "server", .. })
        ));
        assert!(base().server(0, ServerParameters::exponential(0.0)).build().is_err());
        assert!(base().server(0, ServerParameters::exponential(f64::INFINITY)).build().is_err());
        assert!(base()
            .server(1, ServerParameters::new(Family::HyperExponential2, 1.0, 0.5))
            .build()
            .is_err());
        assert!(matches!(
            base()
                .server(0, ServerParameters::new(Family::Uniform, 1e308, 0.0))
                .build(),
            Err(ConfigError::ConstraintViolation { .. })
        ));
        assert!(base()
            .server(1, ServerParameters::new(Family::HyperExponential2, 1.0, 1e20))
            .build()
            .is_err());
        assert!(base().runs(0).build().is_err());
        assert!(base().threads(0).build().is_err());
        assert!(base().step_size(0.0).build().is_err());
        assert!(base().step_size(0.95).build().is_err());
        assert!(base().step_size(0.9).build().is_ok());
        assert!(base().departures_to_simulate(0.0).build().is_err());
    }

    #[test]
    fn test_fraction_tolerance() {
        let thirds = [1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0];
        let config = SimulationConfig::builder(Eligibility::dense(1, 3))
            .fractions(&thirds)
            .build();
        assert!(config.is_ok());
    }

    #[test]
    fn test_rates_and_generators() {
        let config = SimulationConfig::builder(Eligibility::dense(2, 2))
            .servers(vec![ServerParameters::exponential(1.0), ServerParameters::exponential(0.5)])
            .fractions(&[0.25, 0.75])
            .build()
            .unwrap();
        assert_eq!(config.total_service_rate(), 3.0);
        assert!((config.arrival_rate(0.5) - 1.5).abs() < 1e-12);

        let arrivals = config.arrival_generators(0.5).unwrap();
        assert!((arrivals[0].mean() - 1.0 / 0.375).abs() < 1e-12);
        assert!((arrivals[1].mean() - 1.0 / 1.125).abs() < 1e-12);
        assert_eq!(config.service_generators().unwrap().len(), 2);
    }
}
