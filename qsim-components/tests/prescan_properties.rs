//! Property tests for the stability prescan over random systems

use proptest::prelude::*;
use qsim_components::stability::{
    subset_arrival_rate, subset_service_rate, MAX_UTILIZATION, MIN_UTILIZATION,
};
use qsim_components::{
    prescan, utilization_for_level, Eligibility, ServerParameters, SimulationConfig,
};
use qsim_core::ClassId;

/// Random valid system: every server serves a class and every class has a server.
fn system() -> impl Strategy<Value = SimulationConfig> {
    (1usize..5, 1usize..5)
        .prop_flat_map(|(servers, classes)| {
            (
                prop::collection::vec(prop::collection::vec(any::<bool>(), classes), servers),
                prop::collection::vec(0.1f64..10.0, servers),
                prop::collection::vec(0.05f64..1.0, classes),
                0.01f64..=0.9,
            )
        })
        .prop_map(|(mut rows, means, weights, step)| {
            let servers = rows.len();
            let classes = rows[0].len();
            for (s, row) in rows.iter_mut().enumerate() {
                row[s % classes] = true;
            }
            for c in 0..classes {
                rows[c % servers][c] = true;
            }

            let total: f64 = weights.iter().sum();
            let fractions: Vec<f64> = weights.iter().map(|w| w / total).collect();

            SimulationConfig::builder(Eligibility::new(rows).unwrap())
                .servers(means.into_iter().map(ServerParameters::exponential).collect())
                .fractions(&fractions)
                .step_size(step)
                .build()
                .unwrap()
        })
}

proptest! {
    #[test]
    fn prescan_levels_stay_in_range(config in system()) {
        let report = prescan(&config);
        for level in report.levels() {
            let utilization = utilization_for_level(level, config.step_size());
            prop_assert!(utilization >= MIN_UTILIZATION - 1e-12);
            prop_assert!(utilization < MAX_UTILIZATION);
        }
        if let Some(last) = report.last_stable {
            prop_assert!(last < MAX_UTILIZATION);
            let top = utilization_for_level(report.level_count - 1, config.step_size());
            prop_assert!((top - last).abs() < 1e-9);
        }
    }

    #[test]
    fn prescan_levels_are_stable(config in system()) {
        let report = prescan(&config);
        for level in report.levels() {
            let lambda = config.arrival_rate(utilization_for_level(level, config.step_size()));
            for class in (0..config.nr_classes()).map(ClassId) {
                prop_assert!(
                    subset_arrival_rate(&config, class, lambda) < subset_service_rate(&config, class)
                );
            }
        }
        if let Some(limiting) = report.limiting {
            prop_assert!(limiting.arrival_rate >= limiting.service_rate);
            prop_assert!(limiting.utilization < MAX_UTILIZATION);
        }
    }

    #[test]
    fn subset_arrival_rate_covers_own_class(config in system(), lambda in 0.0f64..50.0) {
        for class in (0..config.nr_classes()).map(ClassId) {
            let own = config.classes()[class.0].fraction * lambda;
            prop_assert!(subset_arrival_rate(&config, class, lambda) >= own);
            prop_assert!(subset_arrival_rate(&config, class, lambda) <= lambda * (1.0 + 1e-9));
        }
    }
}
