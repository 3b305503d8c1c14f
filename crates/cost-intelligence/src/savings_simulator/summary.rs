//! Scenario roll-up

use std::collections::BTreeMap;

use super::types::{ScenarioType, SimulationScenario, SimulationSummary, TypeBreakdown};

/// Scale applied to the summed scenario savings.
///
/// Scenarios overlap (one VM can be reserved, rightsized and scheduled), so
/// the plain sum overstates what can be realized together. The factor is a
/// flat haircut rather than a modelled interaction between strategies.
pub const CONSERVATISM_FACTOR: f64 = 0.6;

/// Share of savings above which a scenario counts as high impact
pub const HIGH_IMPACT_PERCENT: f64 = 30.0;

fn names(scenarios: &[&SimulationScenario]) -> String {
    scenarios
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn total_savings(scenarios: &[&SimulationScenario]) -> f64 {
    scenarios.iter().map(|s| s.savings).sum()
}

pub(crate) fn summarize(scenarios: &[SimulationScenario]) -> SimulationSummary {
    let mut resource_costs: BTreeMap<&str, f64> = BTreeMap::new();
    let mut by_type: BTreeMap<ScenarioType, TypeBreakdown> = BTreeMap::new();
    let mut gross_savings = 0.0;

    for scenario in scenarios {
        for (resource, cost) in &scenario.resource_costs {
            resource_costs.entry(resource.as_str()).or_insert(*cost);
        }
        let entry = by_type.entry(scenario.scenario_type).or_default();
        entry.count += 1;
        entry.savings += scenario.savings;
        gross_savings += scenario.savings;
    }

    let total_savings = gross_savings * CONSERVATISM_FACTOR;
    let best_scenario = scenarios
        .iter()
        .reduce(|best, s| if s.savings > best.savings { s } else { best })
        .cloned();

    SimulationSummary {
        total_current_cost: resource_costs.values().sum(),
        total_savings,
        gross_savings,
        annual_savings: total_savings / 30.0 * 365.0,
        scenario_count: scenarios.len(),
        quick_wins: scenarios.iter().filter(|s| s.is_quick_win()).count(),
        by_type,
        best_scenario,
        recommendations: recommendations(scenarios),
    }
}

fn recommendations(scenarios: &[SimulationScenario]) -> Vec<String> {
    let mut recommendations = Vec::new();

    let quick_wins: Vec<&SimulationScenario> =
        scenarios.iter().filter(|s| s.is_quick_win()).collect();
    if !quick_wins.is_empty() {
        recommendations.push(format!(
            "Start with {} low-effort, low-risk scenarios saving {:.2}: {}",
            quick_wins.len(),
            total_savings(&quick_wins),
            names(&quick_wins)
        ));
    }

    let high_impact: Vec<&SimulationScenario> = scenarios
        .iter()
        .filter(|s| s.savings_percent >= HIGH_IMPACT_PERCENT)
        .collect();
    if !high_impact.is_empty() {
        recommendations.push(format!(
            "Prioritize scenarios saving {HIGH_IMPACT_PERCENT:.0}% or more: {}",
            names(&high_impact)
        ));
    }

    let reserved: Vec<&SimulationScenario> = scenarios
        .iter()
        .filter(|s| s.scenario_type == ScenarioType::ReservedInstances)
        .collect();
    if !reserved.is_empty() {
        recommendations.push(format!(
            "Review steady-state usage before committing to reservations worth {:.2}",
            total_savings(&reserved)
        ));
    }

    let scheduled: Vec<&SimulationScenario> = scenarios
        .iter()
        .filter(|s| s.scenario_type == ScenarioType::ScheduledScaling)
        .collect();
    if !scheduled.is_empty() {
        recommendations.push(
            "Tag non-production environments so off-hours schedules can be applied".to_string(),
        );
    }

    recommendations
}
