//! Static scenario template table
//!
//! Each template names the services it applies to, its default model
//! parameters and the formula turning those parameters into a savings
//! percentage.

use std::collections::BTreeMap;

use super::types::ScenarioType;
use crate::types::{ImplementationEffort, RiskLevel};

/// Model parameters keyed by name
pub type Parameters = BTreeMap<String, f64>;

/// Matches every service
pub const ANY_SERVICE: &str = "*";

/// Scenario template
#[derive(Clone, Copy)]
pub struct ScenarioTemplate {
    /// Strategy
    pub scenario_type: ScenarioType,
    /// Display name
    pub name: &'static str,
    /// Description
    pub description: &'static str,
    /// Lowercase service substrings, or [`ANY_SERVICE`]
    pub services: &'static [&'static str],
    /// Risk level
    pub risk_level: RiskLevel,
    /// Implementation effort
    pub effort: ImplementationEffort,
    /// Typical savings range in percent
    pub typical_savings: (f64, f64),
    /// Default model parameters
    pub default_parameters: &'static [(&'static str, f64)],
    /// Known risks
    pub risk_factors: &'static [&'static str],
    /// What must be in place first
    pub prerequisites: &'static [&'static str],
    pub(crate) savings_fn: fn(&Parameters) -> f64,
    pub(crate) break_even_fn: fn(&Parameters, f64) -> Option<f64>,
}

impl ScenarioTemplate {
    /// Default parameters as an owned map
    pub fn parameters(&self) -> Parameters {
        self.default_parameters
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    /// Savings percentage for a parameter set
    pub fn savings_percent(&self, parameters: &Parameters) -> f64 {
        (self.savings_fn)(parameters)
    }

    /// Break-even in months for a parameter set and savings percentage
    pub fn break_even_months(&self, parameters: &Parameters, savings_percent: f64) -> Option<f64> {
        (self.break_even_fn)(parameters, savings_percent)
    }

    /// Whether the lowercased service haystack matches this template
    pub fn matches(&self, haystack: &str) -> bool {
        self.services
            .iter()
            .any(|s| *s == ANY_SERVICE || haystack.contains(s))
    }
}

impl std::fmt::Debug for ScenarioTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioTemplate")
            .field("scenario_type", &self.scenario_type)
            .field("services", &self.services)
            .finish_non_exhaustive()
    }
}

fn param(parameters: &Parameters, key: &str) -> f64 {
    parameters.get(key).copied().unwrap_or(0.0)
}

fn no_break_even(_: &Parameters, _: f64) -> Option<f64> {
    None
}

fn reserved_savings(p: &Parameters) -> f64 {
    let base = if param(p, "term_years") >= 3.0 { 55.0 } else { 35.0 };
    if param(p, "all_upfront") > 0.0 {
        base + 10.0
    } else {
        base
    }
}

fn reserved_break_even(p: &Parameters, savings_percent: f64) -> Option<f64> {
    let term_months = param(p, "term_years").max(1.0) * 12.0;
    Some(term_months * (1.0 - savings_percent / 100.0))
}

fn spot_savings(p: &Parameters) -> f64 {
    (param(p, "spot_eligible_percent") * param(p, "spot_discount") / 100.0).round()
}

fn rightsizing_savings(p: &Parameters) -> f64 {
    let target = param(p, "target_utilization");
    if target <= 0.0 {
        return 0.0;
    }
    let ratio = param(p, "current_utilization") * 1.2 / target;
    ((1.0 - ratio) * 100.0).round().clamp(0.0, 60.0)
}

fn scheduled_savings(p: &Parameters) -> f64 {
    let weekly_hours = param(p, "weekday_hours") * 5.0 + param(p, "weekend_hours") * 2.0;
    ((1.0 - weekly_hours / 168.0) * 100.0).round()
}

fn tiering_savings(p: &Parameters) -> f64 {
    ((param(p, "cold_percent") * 0.5 + param(p, "archive_percent") * 0.9) / 2.0).round()
}

fn region_savings(p: &Parameters) -> f64 {
    param(p, "region_discount")
}

fn license_savings(p: &Parameters) -> f64 {
    (param(p, "coverage_percent") * param(p, "hybrid_discount") / 100.0).round()
}

/// Templates in evaluation order
pub static SCENARIO_TEMPLATES: &[ScenarioTemplate] = &[
    ScenarioTemplate {
        scenario_type: ScenarioType::ReservedInstances,
        name: "Reserved Instances",
        description: "Commit to one or three year reservations for steady compute and database usage",
        services: &["virtual machine", "compute", "ec2", "sql", "database", "app service"],
        risk_level: RiskLevel::Low,
        effort: ImplementationEffort::Low,
        typical_savings: (30.0, 72.0),
        default_parameters: &[("term_years", 1.0), ("all_upfront", 0.0)],
        risk_factors: &[
            "Commitment is billed even if usage drops",
            "Instance family flexibility varies by provider",
        ],
        prerequisites: &[
            "Stable baseline usage for at least 30 days",
            "Budget approval for the commitment",
        ],
        savings_fn: reserved_savings,
        break_even_fn: reserved_break_even,
    },
    ScenarioTemplate {
        scenario_type: ScenarioType::SpotInstances,
        name: "Spot Instances",
        description: "Run interruptible workloads on spot or preemptible capacity",
        services: &["virtual machine", "compute", "ec2", "batch", "kubernetes"],
        risk_level: RiskLevel::High,
        effort: ImplementationEffort::Medium,
        typical_savings: (60.0, 90.0),
        default_parameters: &[("spot_eligible_percent", 30.0), ("spot_discount", 70.0)],
        risk_factors: &[
            "Capacity can be reclaimed with short notice",
            "Spot pricing fluctuates with demand",
        ],
        prerequisites: &[
            "Workloads tolerate interruption",
            "Checkpointing or retry logic in place",
        ],
        savings_fn: spot_savings,
        break_even_fn: no_break_even,
    },
    ScenarioTemplate {
        scenario_type: ScenarioType::Rightsizing,
        name: "Rightsizing",
        description: "Move over-provisioned resources to sizes matching observed utilization",
        services: &["virtual machine", "compute", "sql", "database", "app service"],
        risk_level: RiskLevel::Medium,
        effort: ImplementationEffort::Medium,
        typical_savings: (20.0, 60.0),
        default_parameters: &[("current_utilization", 35.0), ("target_utilization", 70.0)],
        risk_factors: &[
            "Peak load may exceed the smaller size",
            "Resizing can require a restart",
        ],
        prerequisites: &["Utilization metrics covering peak periods"],
        savings_fn: rightsizing_savings,
        break_even_fn: no_break_even,
    },
    ScenarioTemplate {
        scenario_type: ScenarioType::ScheduledScaling,
        name: "Scheduled Scaling",
        description: "Shut down or scale in non-production resources outside working hours",
        services: &["virtual machine", "compute", "app service", "kubernetes"],
        risk_level: RiskLevel::Low,
        effort: ImplementationEffort::Low,
        typical_savings: (40.0, 70.0),
        default_parameters: &[("weekday_hours", 12.0), ("weekend_hours", 0.0)],
        risk_factors: &["Off-hours jobs must be rescheduled"],
        prerequisites: &["Environments tagged as production or non-production"],
        savings_fn: scheduled_savings,
        break_even_fn: no_break_even,
    },
    ScenarioTemplate {
        scenario_type: ScenarioType::StorageTiering,
        name: "Storage Tiering",
        description: "Move infrequently accessed data to cool and archive tiers",
        services: &["storage", "blob", "s3"],
        risk_level: RiskLevel::Low,
        effort: ImplementationEffort::Low,
        typical_savings: (15.0, 50.0),
        default_parameters: &[("cold_percent", 40.0), ("archive_percent", 20.0)],
        risk_factors: &[
            "Retrieval from archive is slow and billed",
            "Early deletion fees on cool tiers",
        ],
        prerequisites: &["Access pattern analysis for the stored data"],
        savings_fn: tiering_savings,
        break_even_fn: no_break_even,
    },
    ScenarioTemplate {
        scenario_type: ScenarioType::RegionMigration,
        name: "Region Migration",
        description: "Relocate workloads to a lower-priced region",
        services: &[ANY_SERVICE],
        risk_level: RiskLevel::Medium,
        effort: ImplementationEffort::High,
        typical_savings: (5.0, 20.0),
        default_parameters: &[("region_discount", 10.0)],
        risk_factors: &[
            "Added latency for users far from the new region",
            "Data residency requirements",
            "Egress charges during migration",
        ],
        prerequisites: &["Compliance review of the target region", "Migration runbook"],
        savings_fn: region_savings,
        break_even_fn: no_break_even,
    },
    ScenarioTemplate {
        scenario_type: ScenarioType::LicenseOptimization,
        name: "License Optimization",
        description: "Apply hybrid benefit and bring-your-own-license pricing",
        services: &["sql", "windows", "license", "oracle"],
        risk_level: RiskLevel::Low,
        effort: ImplementationEffort::Medium,
        typical_savings: (10.0, 40.0),
        default_parameters: &[("coverage_percent", 50.0), ("hybrid_discount", 40.0)],
        risk_factors: &["License compliance audits"],
        prerequisites: &["Inventory of eligible on-premises licenses"],
        savings_fn: license_savings,
        break_even_fn: no_break_even,
    },
];
