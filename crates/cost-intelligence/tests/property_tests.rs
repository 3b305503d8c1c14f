use chrono::{Duration, NaiveDate, TimeZone, Utc};
use finops_cost_intelligence::{
    AnomalyDetector, AnomalyDetectorConfig, DailyCost, DataRange, ResourceAnalysis,
    SavingsSimulator, TimeSeriesPoint, WasteHunter, WasteHunterConfig,
};
use proptest::prelude::*;

const SERVICES: &[&str] = &[
    "Virtual Machines",
    "Storage",
    "Azure SQL Database",
    "Public IP Addresses",
    "Load Balancer",
    "App Service",
    "Backup",
];

fn points_from(series: &[Vec<f64>]) -> Vec<TimeSeriesPoint> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    series
        .iter()
        .enumerate()
        .flat_map(|(r, values)| {
            values.iter().enumerate().map(move |(i, &v)| {
                TimeSeriesPoint::new(start + Duration::days(i as i64), v, format!("res-{r}"))
                    .with_service(SERVICES[r % SERVICES.len()])
            })
        })
        .collect()
}

fn resource_strategy() -> impl Strategy<Value = ResourceAnalysis> {
    (
        0..SERVICES.len(),
        prop::collection::vec(0.0f64..500.0, 1..40),
        0.0f64..500.0,
    )
        .prop_map(|(service, costs, usage)| {
            let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            let daily_costs = costs
                .into_iter()
                .enumerate()
                .map(|(i, cost)| DailyCost {
                    date: start + Duration::days(i as i64),
                    cost,
                })
                .collect();
            let mut resource =
                ResourceAnalysis::new(format!("res-{service}"), SERVICES[service], daily_costs);
            resource.usage_quantity = usage;
            resource
        })
}

proptest! {
    #[test]
    fn test_higher_threshold_never_adds_anomalies(
        series in prop::collection::vec(prop::collection::vec(0.0f64..1000.0, 7..40), 1..4),
        low in 0.0f64..0.5,
        high in 0.5f64..1.0,
    ) {
        let points = points_from(&series);
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        let loose = AnomalyDetector::new(AnomalyDetectorConfig { threshold: low, ..Default::default() }).unwrap();
        let strict = AnomalyDetector::new(AnomalyDetectorConfig { threshold: high, ..Default::default() }).unwrap();

        let loose_results = loose.detect_anomalies_at(&points, now);
        let strict_results = strict.detect_anomalies_at(&points, now);

        prop_assert!(strict_results.len() <= loose_results.len());
        for result in &strict_results {
            prop_assert!(loose_results.iter().any(|r| r.id == result.id));
        }
    }

    #[test]
    fn test_anomalies_are_ranked_and_bounded(
        series in prop::collection::vec(prop::collection::vec(0.0f64..1000.0, 7..40), 1..4),
        sensitivity in 0.05f64..0.95,
    ) {
        let points = points_from(&series);
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let detector = AnomalyDetector::new(AnomalyDetectorConfig { sensitivity, ..Default::default() }).unwrap();

        let results = detector.detect_anomalies_at(&points, now);
        for result in &results {
            prop_assert!((0.0..=1.0).contains(&result.score));
            prop_assert!(result.score >= detector.config().threshold);
        }
        for pair in results.windows(2) {
            prop_assert!(pair[0].severity >= pair[1].severity);
            if pair[0].severity == pair[1].severity {
                prop_assert!(pair[0].score >= pair[1].score);
            }
        }
    }

    #[test]
    fn test_waste_opportunities_are_well_formed(
        resources in prop::collection::vec(resource_strategy(), 0..12),
        min_cost in 0.0f64..200.0,
    ) {
        let hunter = WasteHunter::new(WasteHunterConfig { min_cost_threshold: min_cost, ..Default::default() }).unwrap();
        let opportunities = hunter.analyze_resources(&resources);

        for opportunity in &opportunities {
            prop_assert!(opportunity.potential_savings >= 0.0);
            prop_assert!((0.0..=100.0).contains(&opportunity.confidence));
            prop_assert!(opportunity.current_cost >= min_cost);
        }
        for pair in opportunities.windows(2) {
            prop_assert!(pair[0].potential_savings >= pair[1].potential_savings);
        }

        let range = DataRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 9).unwrap(),
        );
        let summary = hunter.generate_summary(&opportunities, range);
        prop_assert_eq!(summary.total_opportunities, opportunities.len());
        prop_assert!(summary.total_potential_savings <= summary.total_current_cost + 1e-6);
    }

    #[test]
    fn test_scenarios_respect_noise_floors(
        resources in prop::collection::vec(resource_strategy(), 0..12),
    ) {
        let simulator = SavingsSimulator::new();
        let scenarios = simulator.generate_scenarios(&resources);

        for scenario in &scenarios {
            prop_assert!(scenario.current_cost >= 50.0);
            prop_assert!(scenario.savings >= 10.0);
            prop_assert!(scenario.projected_cost <= scenario.current_cost);
        }
        for pair in scenarios.windows(2) {
            prop_assert!(pair[0].savings >= pair[1].savings);
        }

        let summary = simulator.generate_summary(&scenarios);
        prop_assert_eq!(summary.scenario_count, scenarios.len());
        prop_assert!(summary.total_savings <= summary.gross_savings + 1e-9);
    }
}
