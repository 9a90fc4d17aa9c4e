//! N-system sweep
//!
//! Server 0 is flexible and serves both classes, server 1 is dedicated to
//! class 1. The example prints the prescan outcome, the mean waiting time per
//! class at every utilization level and the busy-server configurations seen by
//! class-0 arrivals at the highest level, then writes all summaries as JSON.
//!
//! Run with: cargo run --package qsim-components --example n_system [output.json]

use qsim_components::{ClassParameters, Eligibility, ServerParameters, SimulationConfig, Sweep};
use qsim_core::{init_simulation_logging, Family, SimError};
use qsim_metrics::export_json;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_simulation_logging();

    let eligibility = Eligibility::new(vec![vec![true, true], vec![false, true]])?;

    // Parameters arrive as `Key=Value` lines, the way parameter files are written.
    let mut flexible = ServerParameters::default();
    for line in ["Type=HyperExponential2", "Average=1.0", "CV=2.0"] {
        flexible.apply_line(line)?;
    }
    let mut class_0 = ClassParameters::default();
    class_0.apply_line("Fraction=0.4")?;

    let config = SimulationConfig::builder(eligibility)
        .servers(vec![flexible, ServerParameters::new(Family::Exponential, 0.5, 1.0)])
        .classes(vec![class_0, ClassParameters::new(0.6)])
        .step_size(0.1)
        .runs(4)
        .threads(4)
        .departures_to_simulate(20_000.0)
        .seed(2718)
        .build()?;

    let report = Sweep::new(&config).run()?;

    println!("Stability prescan: {} levels", report.stability.level_count - 1);
    if let Some(limiting) = report.stability.limiting {
        println!(
            "  limited by {} at rho = {:.2} (arrival rate {:.3} >= service rate {:.3})",
            limiting.class, limiting.utilization, limiting.arrival_rate, limiting.service_rate
        );
    }

    println!();
    println!("{:>6} {:>20} {:>20}", "rho", "W class 0", "W class 1");
    let summaries = report.summaries();
    for summary in &summaries {
        println!(
            "{:>6.2} {:>12.4} ± {:<6.4}{:>12.4} ± {:<6.4}",
            summary.utilization,
            summary.wait_by_class[0].mean,
            summary.wait_by_class[0].half_width,
            summary.wait_by_class[1].mean,
            summary.wait_by_class[1].half_width,
        );
    }

    if let Some(top) = summaries.last() {
        println!();
        println!("Configurations seen by class 0 at rho = {:.2}:", top.utilization);
        for entry in &top.configurations[0].entries {
            println!(
                "  {:<8} {:.4} ± {:.4}",
                entry.configuration.to_string(),
                entry.probability.mean,
                entry.probability.half_width
            );
        }
    }

    for failure in &report.failures {
        eprintln!("level {} failed: {}", failure.level, failure.error);
    }

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("n_system.json"));
    export_json(&summaries, &path, true)?;
    println!();
    println!("Summaries written to {}", path.display());

    if report.is_complete() {
        Ok(())
    } else {
        Err(SimError::Internal(format!("{} levels failed", report.failures.len())).into())
    }
}
