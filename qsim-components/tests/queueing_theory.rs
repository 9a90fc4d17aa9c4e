//! Long runs compared against closed-form queueing results
//!
//! Every server has exponential service with mean 1, so utilization ρ means a
//! total arrival rate of ρ times the number of servers.

use qsim_components::{run_level, Eligibility, ServerParameters, SimulationConfig};
use qsim_core::{ClassId, Family, ServerId};
use qsim_metrics::{ConfidenceInterval, ConfigurationOrdering, LevelSummary};

/// Level 2 with a step of 0.45 is utilization 0.5.
const HALF_LOAD_LEVEL: usize = 2;
const HALF_LOAD_STEP: f64 = 0.45;

fn assert_close(name: &str, estimate: ConfidenceInterval, expected: f64, tolerance: f64) {
    let slack = (4.0 * estimate.half_width).max(tolerance);
    assert!(
        (estimate.mean - expected).abs() <= slack,
        "{name}: estimated {} ± {}, expected {expected}",
        estimate.mean,
        estimate.half_width
    );
}

fn probability(summary: &LevelSummary, class: usize, configuration: &str) -> ConfidenceInterval {
    summary.configurations[class]
        .entries
        .iter()
        .find(|entry| entry.configuration.to_string() == configuration)
        .map(|entry| entry.probability)
        .unwrap_or_else(|| panic!("configuration {configuration} never observed"))
}

fn half_load(builder: qsim_components::SimulationConfigBuilder) -> LevelSummary {
    let config = builder
        .step_size(HALF_LOAD_STEP)
        .runs(4)
        .departures_to_simulate(50_000.0)
        .seed(2024)
        .build()
        .unwrap();
    let results = run_level(&config, HALF_LOAD_LEVEL).unwrap();
    assert!((results.utilization() - 0.5).abs() < 1e-12);
    results.summarize()
}

#[test]
fn mm1_at_half_load() {
    let summary = half_load(SimulationConfig::builder(Eligibility::dense(1, 1)));

    // λ = 0.5, μ = 1: Wq = ρ/(μ − λ) = 1, S = 1/(μ − λ) = 2, L = ρ/(1 − ρ) = 1.
    assert_close("W", summary.wait_total, 1.0, 0.1);
    assert_close("S", summary.sojourn, 2.0, 0.1);
    assert_close("Ls", summary.in_system, 1.0, 0.1);
    assert_close("Lq", summary.in_queue, 0.5, 0.08);
    assert_close("P(wait)", summary.wait_probability, 0.5, 0.03);

    // Arrivals see time averages: the server is idle half of the time.
    assert_close("P(-)", probability(&summary, 0, "-"), 0.5, 0.03);
    assert_close("P(0)", probability(&summary, 0, "0"), 0.5, 0.03);
}

#[test]
fn dense_two_servers_match_erlang_c() {
    let summary = half_load(
        SimulationConfig::builder(Eligibility::dense(2, 2)).fractions(&[0.5, 0.5]),
    );

    // M/M/2 with a = λ/μ = 1: C(2, 1) = 1/3 and Wq = C/(2μ − λ) = 1/3.
    assert_close("P(wait)", summary.wait_probability, 1.0 / 3.0, 0.03);
    assert_close("W", summary.wait_total, 1.0 / 3.0, 0.05);
    for class in 0..2 {
        assert_close("W class", summary.wait_by_class[class], 1.0 / 3.0, 0.06);
    }
}

#[test]
fn dense_two_servers_busy_sets() {
    let summary = half_load(
        SimulationConfig::builder(Eligibility::dense(2, 1))
            .configuration_ordering(ConfigurationOrdering::ServerId),
    );

    // Stationary M/M/2 at a = 1: p0 = 1/3, p1 = 1/3, P(n ≥ 2) = 1/3.
    let table = &summary.configurations[0].entries;
    assert!(table.len() <= 4);
    assert_close("P(-)", probability(&summary, 0, "-"), 1.0 / 3.0, 0.03);
    assert_close("P(0 1)", probability(&summary, 0, "0 1"), 1.0 / 3.0, 0.03);
    let one_busy = probability(&summary, 0, "0").mean + probability(&summary, 0, "1").mean;
    assert!((one_busy - 1.0 / 3.0).abs() < 0.03, "P(one busy) = {one_busy}");
}

#[test]
fn dedicated_servers_behave_as_independent_mm1() {
    let summary = half_load(
        SimulationConfig::builder(Eligibility::dedicated(2)).fractions(&[0.5, 0.5]),
    );

    // Each class sees λ = 0.5 against its own server with μ = 1.
    for class in 0..2 {
        assert_close("W class", summary.wait_by_class[class], 1.0, 0.12);
    }
    assert_close("P(wait)", summary.wait_probability, 0.5, 0.03);

    // Class-0 arrivals find their own server busy half of the time.
    let own_busy: f64 = summary.configurations[0]
        .entries
        .iter()
        .filter(|e| e.configuration.servers().contains(&ServerId(0)))
        .map(|e| e.probability.mean)
        .sum();
    assert!((own_busy - 0.5).abs() < 0.03, "P(server 0 busy) = {own_busy}");
}

#[test]
fn deterministic_service_has_shorter_waits() {
    // M/D/1 at ρ = 0.5: Wq = ρ/(2μ(1 − ρ)) = 0.5.
    let summary = half_load(
        SimulationConfig::builder(Eligibility::dense(1, 1))
            .server(0, ServerParameters::new(Family::Deterministic, 1.0, 0.0)),
    );
    assert_close("W", summary.wait_total, 0.5, 0.06);
}

#[test]
fn hyperexponential_service_has_longer_waits() {
    // Variance 2 gives E[S²] = 3, so Pollaczek-Khinchine yields Wq = λE[S²]/(2(1 − ρ)) = 1.5.
    let summary = half_load(
        SimulationConfig::builder(Eligibility::dense(1, 1))
            .server(0, ServerParameters::new(Family::HyperExponential2, 1.0, 2.0)),
    );
    assert_close("W", summary.wait_total, 1.5, 0.25);
    assert_eq!(summary.wait_by_class.len(), 1);
    assert!(summary.configurations[0].class == ClassId(0));
}
