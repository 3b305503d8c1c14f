//! Core input records and shared enums
//!
//! These are the shapes the external query layer hands to the engines:
//! per-resource daily cost series for the anomaly detector and per-resource
//! window summaries for the waste hunter, savings simulator and AI spend
//! classifier.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Namespace for deterministic result ids
const RESULT_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a8e_93d4_4b7a_b5e2_0c9d_71f3_a4e6);

/// Derive a stable id from the identifying parts of a finding
pub(crate) fn stable_id(parts: &[&str]) -> Uuid {
    Uuid::new_v5(&RESULT_ID_NAMESPACE, parts.join("\u{1f}").as_bytes())
}

pub(crate) fn unknown() -> String {
    "Unknown".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_charge_category() -> String {
    "Usage".to_string()
}

/// Time series data point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Cost for the period ending at `timestamp`
    pub value: f64,
    /// Resource the cost belongs to
    pub resource_id: String,
    /// Free-form metadata; `serviceName` is read when present
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl TimeSeriesPoint {
    /// Create a point without metadata
    pub fn new(timestamp: DateTime<Utc>, value: f64, resource_id: impl Into<String>) -> Self {
        Self {
            timestamp,
            value,
            resource_id: resource_id.into(),
            metadata: HashMap::new(),
        }
    }

    /// Attach a service name to the point metadata
    pub fn with_service(mut self, service_name: impl Into<String>) -> Self {
        self.metadata.insert(
            "serviceName".to_string(),
            serde_json::Value::String(service_name.into()),
        );
        self
    }

    /// Service name from metadata, `"Unknown"` when absent or not a string
    pub fn service_name(&self) -> String {
        self.metadata
            .get("serviceName")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(unknown)
    }
}

/// Cost for a single day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyCost {
    /// Calendar day
    pub date: NaiveDate,
    /// Cost for the day
    pub cost: f64,
}

/// Per-resource summary over the analysis window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAnalysis {
    /// Resource ID
    pub resource_id: String,
    /// Display name
    #[serde(default = "unknown")]
    pub resource_name: String,
    /// Resource type (e.g. `virtualMachines`, `Disk`)
    #[serde(default = "unknown")]
    pub resource_type: String,
    /// Billing service name
    #[serde(default = "unknown")]
    pub service_name: String,
    /// Billing service category
    #[serde(default = "unknown")]
    pub service_category: String,
    /// Region
    #[serde(default = "unknown")]
    pub region: String,
    /// Total cost over the window
    #[serde(default)]
    pub total_cost: f64,
    /// Daily cost series
    #[serde(default)]
    pub daily_costs: Vec<DailyCost>,
    /// Average daily cost
    #[serde(default)]
    pub avg_daily_cost: f64,
    /// Summed usage quantity over the window
    #[serde(default)]
    pub usage_quantity: f64,
    /// Unit the usage quantity is expressed in
    #[serde(default = "unknown")]
    pub pricing_unit: String,
    /// Resource tags
    #[serde(default)]
    pub tags: HashMap<String, String>,
    /// Charge category (Usage, Purchase, ...)
    #[serde(default = "default_charge_category")]
    pub charge_category: String,
    /// Billing currency
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl ResourceAnalysis {
    /// Build a summary from a daily series, deriving the cost totals
    pub fn new(
        resource_id: impl Into<String>,
        service_name: impl Into<String>,
        daily_costs: Vec<DailyCost>,
    ) -> Self {
        let resource_id = resource_id.into();
        let total_cost: f64 = daily_costs.iter().map(|d| d.cost).sum();
        let avg_daily_cost = if daily_costs.is_empty() {
            0.0
        } else {
            total_cost / daily_costs.len() as f64
        };

        Self {
            resource_name: resource_id.clone(),
            resource_id,
            resource_type: unknown(),
            service_name: service_name.into(),
            service_category: unknown(),
            region: unknown(),
            total_cost,
            daily_costs,
            avg_daily_cost,
            usage_quantity: 0.0,
            pricing_unit: unknown(),
            tags: HashMap::new(),
            charge_category: default_charge_category(),
            currency: default_currency(),
        }
    }

    /// Number of days with non-zero cost
    pub fn active_days(&self) -> usize {
        self.daily_costs.iter().filter(|d| d.cost > 0.0).count()
    }

    /// Daily cost values in series order
    pub fn daily_values(&self) -> Vec<f64> {
        self.daily_costs.iter().map(|d| d.cost).collect()
    }

    /// Inclusive number of calendar days between the first and last billed day
    pub fn billed_span_days(&self) -> u32 {
        let mut billed = self.daily_costs.iter().filter(|d| d.cost > 0.0).map(|d| d.date);
        let Some(first) = billed.next() else {
            return 0;
        };
        let (min, max) = billed.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        (max - min).num_days() as u32 + 1
    }

    /// Last day with non-zero cost
    pub fn last_active_date(&self) -> Option<NaiveDate> {
        self.daily_costs
            .iter()
            .filter(|d| d.cost > 0.0)
            .map(|d| d.date)
            .max()
    }

    /// Lowercased service name, service category and resource type joined for matching
    pub(crate) fn service_haystack(&self) -> String {
        format!(
            "{} {} {}",
            self.service_name, self.service_category, self.resource_type
        )
        .to_lowercase()
    }

    /// Case-insensitive tag lookup
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// Severity shared by anomaly and waste findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Low severity
    Low,
    /// Medium severity
    Medium,
    /// High severity
    High,
    /// Critical severity
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Implementation effort level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImplementationEffort {
    /// Low effort
    Low,
    /// Medium effort
    Medium,
    /// High effort
    High,
}

/// Risk level for an optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Low risk
    Low,
    /// Medium risk
    Medium,
    /// High risk
    High,
}
