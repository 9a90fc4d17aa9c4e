//! Basic usage example showing how to use the qsim meta-crate

use qsim::prelude::*;

fn main() {
    init_simulation_logging();

    // Two servers that may serve the single customer class.
    let config = SimulationConfig::builder(Eligibility::dense(2, 1))
        .step_size(0.3)
        .runs(5)
        .departures_to_simulate(20_000.0)
        .seed(7)
        .build()
        .expect("valid configuration");

    let report = Sweep::new(&config).run().expect("sweep");

    println!("{:>6} {:>18} {:>18}", "rho", "W", "P(wait)");
    for summary in report.summaries() {
        println!(
            "{:>6.2} {:>10.4} ± {:<6.4} {:>10.4} ± {:<6.4}",
            summary.utilization,
            summary.wait_total.mean,
            summary.wait_total.half_width,
            summary.wait_probability.mean,
            summary.wait_probability.half_width,
        );
    }
}
