//! Engine configuration bundle
//!
//! One JSON document can configure every engine; missing sections and
//! fields fall back to their defaults.
//!
//! ```json
//! {
//!   "anomaly": { "sensitivity": 0.7, "methods": ["statistical", "time-series"] },
//!   "waste": { "idleThresholdDays": 14, "categories": ["idle", "untagged"] }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::anomaly_detector::{AnomalyDetector, AnomalyDetectorConfig};
use crate::error::CostIntelligenceResult;
use crate::waste_hunter::{WasteHunter, WasteHunterConfig};

/// Configuration for all engines
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CostIntelligenceConfig {
    /// Anomaly detector configuration
    pub anomaly: AnomalyDetectorConfig,
    /// Waste hunter configuration
    pub waste: WasteHunterConfig,
}

impl CostIntelligenceConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> CostIntelligenceResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> CostIntelligenceResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        info!("Loaded cost intelligence configuration from {}", path.display());
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> CostIntelligenceResult<()> {
        self.anomaly.validate()?;
        self.waste.validate()
    }

    /// Build an anomaly detector from this configuration
    pub fn anomaly_detector(&self) -> CostIntelligenceResult<AnomalyDetector> {
        AnomalyDetector::new(self.anomaly.clone())
    }

    /// Build a waste hunter from this configuration
    pub fn waste_hunter(&self) -> CostIntelligenceResult<WasteHunter> {
        WasteHunter::new(self.waste.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly_detector::DetectionMethod;
    use crate::error::CostIntelligenceError;
    use crate::waste_hunter::WasteCategory;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = CostIntelligenceConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CostIntelligenceConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = CostIntelligenceConfig::from_json_str(
            r#"{
                "anomaly": { "sensitivity": 0.7, "methods": ["statistical", "time-series"] },
                "waste": { "idleThresholdDays": 14, "categories": ["idle", "untagged"] }
            }"#,
        )
        .unwrap();

        assert_eq!(config.anomaly.sensitivity, 0.7);
        assert_eq!(
            config.anomaly.methods,
            vec![DetectionMethod::Statistical, DetectionMethod::TimeSeries]
        );
        assert_eq!(config.anomaly.window_days, 30);
        assert_eq!(config.waste.idle_threshold_days, 14);
        assert_eq!(
            config.waste.categories,
            vec![WasteCategory::Idle, WasteCategory::Untagged]
        );
        assert!(config.anomaly_detector().is_ok());
        assert!(config.waste_hunter().is_ok());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = CostIntelligenceConfig::from_json_str(r#"{"anomaly": {"sensitivity": 2.0}}"#);
        assert!(matches!(
            result,
            Err(CostIntelligenceError::ConfigurationError { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        let result = CostIntelligenceConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(CostIntelligenceError::JsonError { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = CostIntelligenceConfig::from_file("/nonexistent/cost-intelligence.json");
        assert!(matches!(result, Err(CostIntelligenceError::IoError { .. })));
    }
}
