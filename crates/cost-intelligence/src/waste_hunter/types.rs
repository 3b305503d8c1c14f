//! Type definitions for the waste hunter

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

use crate::error::{CostIntelligenceError, CostIntelligenceResult};
use crate::types::{ImplementationEffort, Severity};

/// Waste category, one per detection rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WasteCategory {
    /// Compute billing with little or no usage
    Idle,
    /// Missing cost allocation tags
    Untagged,
    /// Long-lived snapshots and backups
    StaleSnapshot,
    /// Storage with no reads or writes
    UnusedStorage,
    /// Database with minimal activity
    IdleDatabase,
    /// Legacy instance generation
    OldGeneration,
    /// Allocated public IP not serving traffic
    UnusedIp,
    /// Load balancer or gateway with no traffic
    IdleLoadBalancer,
}

impl WasteCategory {
    /// Every category in rule order
    pub const ALL: [WasteCategory; 8] = [
        WasteCategory::Idle,
        WasteCategory::Untagged,
        WasteCategory::StaleSnapshot,
        WasteCategory::UnusedStorage,
        WasteCategory::IdleDatabase,
        WasteCategory::OldGeneration,
        WasteCategory::UnusedIp,
        WasteCategory::IdleLoadBalancer,
    ];
}

impl std::fmt::Display for WasteCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WasteCategory::Idle => "idle",
            WasteCategory::Untagged => "untagged",
            WasteCategory::StaleSnapshot => "stale-snapshot",
            WasteCategory::UnusedStorage => "unused-storage",
            WasteCategory::IdleDatabase => "idle-database",
            WasteCategory::OldGeneration => "old-generation",
            WasteCategory::UnusedIp => "unused-ip",
            WasteCategory::IdleLoadBalancer => "idle-load-balancer",
        };
        write!(f, "{name}")
    }
}

/// Waste hunter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WasteHunterConfig {
    /// Minimum active days before a resource can be called idle
    pub idle_threshold_days: u32,
    /// Utilization percentage under which compute counts as idle
    pub utilization_threshold: f64,
    /// Resources cheaper than this over the window are skipped
    pub min_cost_threshold: f64,
    /// Enabled categories
    pub categories: Vec<WasteCategory>,
    /// Length of the analysis window in days
    pub analysis_window_days: u32,
}

impl Default for WasteHunterConfig {
    fn default() -> Self {
        Self {
            idle_threshold_days: 7,
            utilization_threshold: 10.0,
            min_cost_threshold: 1.0,
            categories: WasteCategory::ALL.to_vec(),
            analysis_window_days: 30,
        }
    }
}

impl WasteHunterConfig {
    /// Validate value ranges
    pub fn validate(&self) -> CostIntelligenceResult<()> {
        if self.idle_threshold_days == 0 {
            return Err(CostIntelligenceError::config(
                "idle_threshold_days must be greater than 0",
            ));
        }

        if !(0.0..=100.0).contains(&self.utilization_threshold) {
            return Err(CostIntelligenceError::config(
                "utilization_threshold must be between 0 and 100",
            ));
        }

        if !(self.min_cost_threshold >= 0.0 && self.min_cost_threshold.is_finite()) {
            return Err(CostIntelligenceError::config(
                "min_cost_threshold must be a non-negative number",
            ));
        }

        if self.categories.is_empty() {
            return Err(CostIntelligenceError::config(
                "at least one waste category must be enabled",
            ));
        }

        if self.analysis_window_days == 0 {
            return Err(CostIntelligenceError::config(
                "analysis_window_days must be greater than 0",
            ));
        }

        Ok(())
    }
}

/// Supporting fact for an opportunity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    /// Evidence kind (e.g. `active-days`)
    pub kind: String,
    /// Description
    pub description: String,
    /// Measured value
    pub value: f64,
}

impl Evidence {
    pub(crate) fn new(kind: &str, description: impl Into<String>, value: f64) -> Self {
        Self {
            kind: kind.to_string(),
            description: description.into(),
            value,
        }
    }
}

/// Remediation step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Short action name
    pub action: String,
    /// Description
    pub description: String,
    /// Implementation effort
    pub effort: ImplementationEffort,
    /// Estimated savings if applied
    pub estimated_savings: f64,
}

impl Recommendation {
    pub(crate) fn new(
        action: &str,
        description: impl Into<String>,
        effort: ImplementationEffort,
        estimated_savings: f64,
    ) -> Self {
        Self {
            action: action.to_string(),
            description: description.into(),
            effort,
            estimated_savings,
        }
    }
}

/// Waste opportunity for a single resource and rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteOpportunity {
    /// Opportunity ID
    pub id: Uuid,
    /// Category
    pub category: WasteCategory,
    /// Severity
    pub severity: Severity,
    /// Resource ID
    pub resource_id: String,
    /// Resource name
    pub resource_name: String,
    /// Resource type
    pub resource_type: String,
    /// Service name
    pub service_name: String,
    /// Region
    pub region: String,
    /// Cost over the analysis window
    pub current_cost: f64,
    /// Estimated savings
    pub potential_savings: f64,
    /// Savings as a percentage of the current cost
    pub savings_percent: f64,
    /// Confidence (0-100)
    pub confidence: f64,
    /// Why the rule fired
    pub reason: String,
    /// Supporting facts
    pub evidence: Vec<Evidence>,
    /// Remediation steps, most direct first
    pub recommendations: Vec<Recommendation>,
    /// Detection time
    pub detected_at: DateTime<Utc>,
    /// Days the resource has billed without meaningful activity
    pub days_since_activity: Option<u32>,
    /// Resource tags
    pub tags: HashMap<String, String>,
}

/// What a rule reports when it fires
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RuleMatch {
    pub severity: Severity,
    pub confidence: f64,
    pub reason: String,
    pub potential_savings: f64,
    pub evidence: Vec<Evidence>,
    pub recommendations: Vec<Recommendation>,
    pub days_since_activity: Option<u32>,
}

/// Date range the analyzed data covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRange {
    /// First day
    pub start: NaiveDate,
    /// Last day
    pub end: NaiveDate,
}

impl DataRange {
    /// Create a range
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Number of days covered, inclusive
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Per-category totals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    /// Number of opportunities
    pub count: usize,
    /// Summed potential savings
    pub potential_savings: f64,
}

/// Per-service totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBreakdown {
    /// Service name
    pub service_name: String,
    /// Number of opportunities
    pub count: usize,
    /// Summed potential savings
    pub potential_savings: f64,
}

/// Aggregate view over a set of opportunities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteSummary {
    /// Number of opportunities
    pub total_opportunities: usize,
    /// Cost of the distinct resources involved
    pub total_current_cost: f64,
    /// Potential savings, capped per resource at its cost
    pub total_potential_savings: f64,
    /// Savings as a percentage of the current cost
    pub savings_percent: f64,
    /// Totals per category
    pub by_category: BTreeMap<WasteCategory, CategoryBreakdown>,
    /// Counts per severity
    pub by_severity: BTreeMap<Severity, usize>,
    /// Top services by potential savings
    pub by_service: Vec<ServiceBreakdown>,
    /// Largest opportunities
    pub top_opportunities: Vec<WasteOpportunity>,
    /// Data range analyzed
    pub data_range: DataRange,
    /// Opportunities with a low-effort first step and confidence of at least 80
    pub quick_wins: usize,
    /// Summary time
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WasteHunterConfig::default();
        assert_eq!(config.idle_threshold_days, 7);
        assert_eq!(config.utilization_threshold, 10.0);
        assert_eq!(config.min_cost_threshold, 1.0);
        assert_eq!(config.categories.len(), 8);
        assert_eq!(config.analysis_window_days, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = WasteHunterConfig {
            utilization_threshold: 150.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = WasteHunterConfig {
            min_cost_threshold: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = WasteHunterConfig {
            idle_threshold_days: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = WasteHunterConfig {
            categories: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!(
            serde_json::to_string(&WasteCategory::StaleSnapshot).unwrap(),
            "\"stale-snapshot\""
        );
        assert_eq!(WasteCategory::IdleLoadBalancer.to_string(), "idle-load-balancer");
        let parsed: WasteCategory = serde_json::from_str("\"unused-ip\"").unwrap();
        assert_eq!(parsed, WasteCategory::UnusedIp);
    }

    #[test]
    fn test_data_range_days() {
        let range = DataRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 30).unwrap(),
        );
        assert_eq!(range.days(), 30);
    }
}
