//! What-if savings scenarios over per-resource cost summaries
//!
//! Each template in [`templates::SCENARIO_TEMPLATES`] is matched against the
//! resources it applies to and priced with its default parameters. Scenarios
//! below the noise floor are dropped and the rest ranked by savings.

pub mod summary;
pub mod templates;
pub mod types;

pub use summary::{CONSERVATISM_FACTOR, HIGH_IMPACT_PERCENT};
pub use templates::{Parameters, ScenarioTemplate, ANY_SERVICE, SCENARIO_TEMPLATES};
pub use types::*;

use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::types::{stable_id, ImplementationEffort, ResourceAnalysis, RiskLevel};

/// Minimum matched cost for a scenario to be reported
pub const MIN_SCENARIO_COST: f64 = 50.0;
/// Minimum savings for a scenario to be reported
pub const MIN_SCENARIO_SAVINGS: f64 = 10.0;
/// Days the supplied costs cover
const WINDOW_DAYS: f64 = 30.0;

/// Savings simulator engine
#[derive(Debug, Clone)]
pub struct SavingsSimulator {
    templates: &'static [ScenarioTemplate],
}

impl SavingsSimulator {
    /// Create a simulator over the built-in template table
    pub fn new() -> Self {
        Self {
            templates: SCENARIO_TEMPLATES,
        }
    }

    /// Create a simulator over a custom template table
    pub fn with_templates(templates: &'static [ScenarioTemplate]) -> Self {
        Self { templates }
    }

    /// Templates this simulator evaluates
    pub fn templates(&self) -> &'static [ScenarioTemplate] {
        self.templates
    }

    /// Generate scenarios for the given resources, largest savings first
    pub fn generate_scenarios(&self, resources: &[ResourceAnalysis]) -> Vec<SimulationScenario> {
        info!("Simulating savings across {} resources", resources.len());

        let priced: Vec<(&ResourceAnalysis, String)> = resources
            .iter()
            .filter(|r| {
                let finite = r.total_cost.is_finite();
                if !finite {
                    debug!("Skipping resource {} with non-finite cost", r.resource_id);
                }
                finite
            })
            .map(|r| (r, r.service_haystack()))
            .collect();

        let mut scenarios: Vec<SimulationScenario> = self
            .templates
            .iter()
            .filter_map(|template| {
                let matched: Vec<&ResourceAnalysis> = priced
                    .iter()
                    .filter(|(_, haystack)| template.matches(haystack))
                    .map(|(r, _)| *r)
                    .collect();
                self.price_template(template, &matched)
            })
            .collect();

        scenarios.sort_by(|a, b| b.savings.total_cmp(&a.savings));

        info!("Generated {} savings scenarios", scenarios.len());
        scenarios
    }

    /// Summarize a set of scenarios
    pub fn generate_summary(&self, scenarios: &[SimulationScenario]) -> SimulationSummary {
        summary::summarize(scenarios)
    }

    /// Model a flat discount over the given resources
    pub fn create_custom_scenario(
        &self,
        name: &str,
        description: &str,
        resources: &[ResourceAnalysis],
        discount_percent: f64,
    ) -> SimulationScenario {
        let discount = if discount_percent.is_finite() {
            discount_percent.clamp(0.0, 100.0)
        } else {
            warn!("Non-finite discount {} for scenario {}, using 0", discount_percent, name);
            0.0
        };

        let resources: Vec<&ResourceAnalysis> =
            resources.iter().filter(|r| r.total_cost.is_finite()).collect();
        let mut parameters = BTreeMap::new();
        parameters.insert("discount_percent".to_string(), discount);

        build_scenario(ScenarioParts {
            id_key: name,
            name,
            description,
            scenario_type: ScenarioType::Custom,
            resources: &resources,
            parameters,
            savings_percent: discount,
            risk_level: RiskLevel::Medium,
            effort: ImplementationEffort::Medium,
            risk_factors: Vec::new(),
            prerequisites: Vec::new(),
            break_even_months: None,
        })
    }

    fn price_template(
        &self,
        template: &ScenarioTemplate,
        resources: &[&ResourceAnalysis],
    ) -> Option<SimulationScenario> {
        let current_cost: f64 = resources.iter().map(|r| r.total_cost).sum();
        if current_cost < MIN_SCENARIO_COST {
            debug!(
                "Skipping {} scenario: matched cost {:.2} below floor",
                template.scenario_type, current_cost
            );
            return None;
        }

        let parameters = template.parameters();
        let savings_percent = template.savings_percent(&parameters);
        let break_even_months = template.break_even_months(&parameters, savings_percent);
        let type_key = template.scenario_type.to_string();

        let scenario = build_scenario(ScenarioParts {
            id_key: &type_key,
            name: template.name,
            description: template.description,
            scenario_type: template.scenario_type,
            resources,
            parameters,
            savings_percent,
            risk_level: template.risk_level,
            effort: template.effort,
            risk_factors: template.risk_factors.iter().map(|s| s.to_string()).collect(),
            prerequisites: template.prerequisites.iter().map(|s| s.to_string()).collect(),
            break_even_months,
        });

        if scenario.savings < MIN_SCENARIO_SAVINGS {
            debug!(
                "Skipping {} scenario: savings {:.2} below floor",
                template.scenario_type, scenario.savings
            );
            return None;
        }
        Some(scenario)
    }
}

impl Default for SavingsSimulator {
    fn default() -> Self {
        Self::new()
    }
}

struct ScenarioParts<'a> {
    id_key: &'a str,
    name: &'a str,
    description: &'a str,
    scenario_type: ScenarioType,
    resources: &'a [&'a ResourceAnalysis],
    parameters: Parameters,
    savings_percent: f64,
    risk_level: RiskLevel,
    effort: ImplementationEffort,
    risk_factors: Vec<String>,
    prerequisites: Vec<String>,
    break_even_months: Option<f64>,
}

fn build_scenario(parts: ScenarioParts<'_>) -> SimulationScenario {
    let current_cost: f64 = parts.resources.iter().map(|r| r.total_cost).sum();
    let projected_cost = current_cost * (1.0 - parts.savings_percent / 100.0);
    let savings = (current_cost - projected_cost).max(0.0);
    let annual_savings = savings / WINDOW_DAYS * 365.0;

    let mut target_services: Vec<String> = Vec::new();
    for resource in parts.resources {
        if !target_services.contains(&resource.service_name) {
            target_services.push(resource.service_name.clone());
        }
    }

    let mut resource_costs = BTreeMap::new();
    for resource in parts.resources {
        *resource_costs
            .entry(resource.resource_id.clone())
            .or_insert(0.0) += resource.total_cost;
    }

    SimulationScenario {
        id: stable_id(&["scenario", parts.scenario_type.to_string().as_str(), parts.id_key]),
        name: parts.name.to_string(),
        description: parts.description.to_string(),
        scenario_type: parts.scenario_type,
        target_services,
        target_resources: parts.resources.iter().map(|r| r.resource_id.clone()).collect(),
        parameters: parts.parameters,
        current_cost,
        projected_cost,
        savings,
        savings_percent: if current_cost > 0.0 {
            savings / current_cost * 100.0
        } else {
            0.0
        },
        risk_level: parts.risk_level,
        risk_factors: parts.risk_factors,
        effort: parts.effort,
        prerequisites: parts.prerequisites,
        break_even_months: parts.break_even_months,
        annual_savings,
        three_year_savings: annual_savings * 3.0,
        resource_costs,
    }
}
