//! Type definitions for the savings simulator

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::types::{ImplementationEffort, RiskLevel};

/// Optimization strategy a scenario models
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioType {
    /// Reserved instances or savings plans
    ReservedInstances,
    /// Spot or preemptible capacity
    SpotInstances,
    /// Smaller instance sizes
    Rightsizing,
    /// Off-hours shutdown schedules
    ScheduledScaling,
    /// Cool and archive storage tiers
    StorageTiering,
    /// Cheaper region
    RegionMigration,
    /// Hybrid benefit and license reuse
    LicenseOptimization,
    /// Caller-defined discount
    Custom,
}

impl std::fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScenarioType::ReservedInstances => "reserved-instances",
            ScenarioType::SpotInstances => "spot-instances",
            ScenarioType::Rightsizing => "rightsizing",
            ScenarioType::ScheduledScaling => "scheduled-scaling",
            ScenarioType::StorageTiering => "storage-tiering",
            ScenarioType::RegionMigration => "region-migration",
            ScenarioType::LicenseOptimization => "license-optimization",
            ScenarioType::Custom => "custom",
        };
        write!(f, "{name}")
    }
}

/// Simulated optimization scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationScenario {
    /// Scenario ID
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Strategy
    pub scenario_type: ScenarioType,
    /// Distinct services covered, in input order
    pub target_services: Vec<String>,
    /// Resources covered, in input order
    pub target_resources: Vec<String>,
    /// Model parameters
    pub parameters: BTreeMap<String, f64>,
    /// Current cost of the covered resources
    pub current_cost: f64,
    /// Cost after the change
    pub projected_cost: f64,
    /// Savings over the analysis window
    pub savings: f64,
    /// Savings as a percentage of the current cost
    pub savings_percent: f64,
    /// Risk level
    pub risk_level: RiskLevel,
    /// Known risks
    pub risk_factors: Vec<String>,
    /// Implementation effort
    pub effort: ImplementationEffort,
    /// What must be in place first
    pub prerequisites: Vec<String>,
    /// Months until an up-front commitment pays for itself
    pub break_even_months: Option<f64>,
    /// Savings extrapolated to a year
    pub annual_savings: f64,
    /// Savings extrapolated to three years
    pub three_year_savings: f64,
    /// Cost per covered resource
    #[serde(default)]
    pub resource_costs: BTreeMap<String, f64>,
}

impl SimulationScenario {
    /// Low effort and low risk
    pub fn is_quick_win(&self) -> bool {
        self.effort == ImplementationEffort::Low && self.risk_level == RiskLevel::Low
    }
}

/// Per-type totals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeBreakdown {
    /// Number of scenarios
    pub count: usize,
    /// Summed savings
    pub savings: f64,
}

/// Aggregate view over a set of scenarios
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    /// Cost of the distinct resources covered
    pub total_current_cost: f64,
    /// Gross savings scaled by the conservatism factor
    pub total_savings: f64,
    /// Sum of scenario savings; scenarios overlap so this overstates
    pub gross_savings: f64,
    /// `total_savings` extrapolated to a year
    pub annual_savings: f64,
    /// Number of scenarios
    pub scenario_count: usize,
    /// Scenarios with low effort and low risk
    pub quick_wins: usize,
    /// Totals per scenario type
    pub by_type: BTreeMap<ScenarioType, TypeBreakdown>,
    /// Scenario with the largest savings
    pub best_scenario: Option<SimulationScenario>,
    /// Ordered next steps
    pub recommendations: Vec<String>,
}
