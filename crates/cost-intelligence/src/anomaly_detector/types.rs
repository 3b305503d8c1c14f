//! Type definitions for the anomaly detector
//!
//! Configuration, detection methods, and the serializable result records
//! handed back to the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

use crate::error::{CostIntelligenceError, CostIntelligenceResult};
use crate::types::Severity;

/// Detection method
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionMethod {
    /// Z-score and IQR outliers against the whole series
    Statistical,
    /// Deviation from a trailing rolling window
    TimeSeries,
    /// First appearance of a cost-bearing resource
    Pattern,
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectionMethod::Statistical => write!(f, "statistical"),
            DetectionMethod::TimeSeries => write!(f, "time-series"),
            DetectionMethod::Pattern => write!(f, "pattern"),
        }
    }
}

/// Anomaly type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnomalyType {
    /// Spike in costs
    CostSpike,
    /// Drop in costs
    CostDrop,
    /// Cost moved without matching usage
    UsageMismatch,
    /// Newly appeared resource
    NewResource,
    /// Resource billing with no activity
    IdleResource,
    /// Spend beyond a budget
    BudgetViolation,
    /// Deviation from the weekly seasonal profile
    SeasonalDeviation,
    /// Break in an established pattern
    PatternBreak,
}

impl std::fmt::Display for AnomalyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AnomalyType::CostSpike => "cost-spike",
            AnomalyType::CostDrop => "cost-drop",
            AnomalyType::UsageMismatch => "usage-mismatch",
            AnomalyType::NewResource => "new-resource",
            AnomalyType::IdleResource => "idle-resource",
            AnomalyType::BudgetViolation => "budget-violation",
            AnomalyType::SeasonalDeviation => "seasonal-deviation",
            AnomalyType::PatternBreak => "pattern-break",
        };
        write!(f, "{name}")
    }
}

/// Anomaly detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnomalyDetectorConfig {
    /// Detection sensitivity (0 - 1); higher flags smaller deviations
    pub sensitivity: f64,
    /// Minimum normalized score (0 - 1) for a finding to be returned
    pub threshold: f64,
    /// Per-resource lookback in days, measured from the resource's latest point
    pub window_days: u32,
    /// Enabled detection methods
    pub methods: Vec<DetectionMethod>,
    /// Normalize values by day-of-week profile before detection
    pub seasonal_adjustment: bool,
}

impl Default for AnomalyDetectorConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.5,
            threshold: 0.5,
            window_days: 30,
            methods: vec![
                DetectionMethod::Statistical,
                DetectionMethod::TimeSeries,
                DetectionMethod::Pattern,
            ],
            seasonal_adjustment: false,
        }
    }
}

impl AnomalyDetectorConfig {
    /// Validate value ranges
    pub fn validate(&self) -> CostIntelligenceResult<()> {
        if !(self.sensitivity > 0.0 && self.sensitivity < 1.0) {
            return Err(CostIntelligenceError::config(
                "sensitivity must be between 0 and 1 (exclusive)",
            ));
        }

        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(CostIntelligenceError::config(
                "threshold must be between 0 and 1",
            ));
        }

        if self.window_days == 0 {
            return Err(CostIntelligenceError::config(
                "window_days must be greater than 0",
            ));
        }

        if self.methods.is_empty() {
            return Err(CostIntelligenceError::config(
                "at least one detection method must be enabled",
            ));
        }

        Ok(())
    }
}

/// Cost impact of an anomaly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyImpact {
    /// Actual minus expected cost
    pub cost_impact: f64,
    /// Percentage change from expected to actual
    pub percentage_increase: f64,
}

/// Numbers the finding was derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyContext {
    /// Expected cost
    pub expected_cost: f64,
    /// Actual cost
    pub actual_cost: f64,
    /// Mean cost over the analyzed series
    pub historical_average: f64,
    /// Method that produced the finding
    pub method: DetectionMethod,
}

/// Anomaly detection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyResult {
    /// Anomaly ID
    pub id: Uuid,
    /// Timestamp of the anomalous point
    pub timestamp: DateTime<Utc>,
    /// Resource ID
    pub resource_id: String,
    /// Service name
    pub service_name: String,
    /// Anomaly type
    pub anomaly_type: AnomalyType,
    /// Severity
    pub severity: Severity,
    /// Normalized score (0-1)
    pub score: f64,
    /// Human readable description
    pub description: String,
    /// Cost impact
    pub impact: AnomalyImpact,
    /// Detection context
    pub context: AnomalyContext,
    /// Suggested follow-ups
    pub recommendations: Vec<String>,
    /// Method specific details
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Aggregate view over a set of anomalies
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalySummary {
    /// Total number of anomalies
    pub total: usize,
    /// Count per severity
    pub by_severity: BTreeMap<Severity, usize>,
    /// Count per anomaly type
    pub by_type: BTreeMap<AnomalyType, usize>,
    /// Sum of positive cost impacts
    pub total_cost_impact: f64,
    /// Number of distinct resources affected
    pub affected_resources: usize,
    /// Highest normalized score
    pub highest_score: f64,
}

/// Raw finding produced by a detection method before it is rendered
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Detection {
    /// Timestamp of the point the finding is about
    pub timestamp: DateTime<Utc>,
    pub method: DetectionMethod,
    pub anomaly_type: AnomalyType,
    pub expected: f64,
    pub actual: f64,
    /// Pre-normalization magnitude (|z| or rolling deviation)
    pub magnitude: f64,
    pub score: f64,
    /// Set by methods with a fixed severity
    pub fixed_severity: Option<Severity>,
    /// Seasonal factor applied at this point (1.0 when unadjusted)
    pub seasonal_factor: f64,
    /// Rolling window length for time-series findings
    pub window: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnomalyDetectorConfig::default();
        assert_eq!(config.sensitivity, 0.5);
        assert_eq!(config.threshold, 0.5);
        assert_eq!(config.window_days, 30);
        assert_eq!(config.methods.len(), 3);
        assert!(!config.seasonal_adjustment);
    }

    #[test]
    fn test_config_partial_json() {
        let config: AnomalyDetectorConfig =
            serde_json::from_str(r#"{"sensitivity": 0.8, "methods": ["statistical"]}"#).unwrap();
        assert_eq!(config.sensitivity, 0.8);
        assert_eq!(config.methods, vec![DetectionMethod::Statistical]);
        assert_eq!(config.threshold, 0.5);
    }

    #[test]
    fn test_config_validation() {
        assert!(AnomalyDetectorConfig::default().validate().is_ok());

        for sensitivity in [0.0, 1.0, -0.2, f64::NAN] {
            let config = AnomalyDetectorConfig {
                sensitivity,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "sensitivity {sensitivity}");
        }

        let config = AnomalyDetectorConfig {
            threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AnomalyDetectorConfig {
            window_days: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AnomalyDetectorConfig {
            methods: vec![],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CostIntelligenceError::ConfigurationError { .. })
        ));
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&AnomalyType::CostSpike).unwrap(),
            "\"cost-spike\""
        );
        assert_eq!(
            serde_json::to_string(&DetectionMethod::TimeSeries).unwrap(),
            "\"time-series\""
        );
        assert_eq!(AnomalyType::SeasonalDeviation.to_string(), "seasonal-deviation");
        assert_eq!(DetectionMethod::Pattern.to_string(), "pattern");
    }
}
