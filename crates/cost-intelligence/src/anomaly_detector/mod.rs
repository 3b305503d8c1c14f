//! Anomaly detection over per-resource daily cost series
//!
//! Points are grouped by resource in input order, each group is analyzed by
//! the enabled methods, and the raw detections are rendered into
//! [`AnomalyResult`]s ranked by severity and score.
//!
//! ## Module Structure
//!
//! - `types`: Configuration and result records
//! - `methods`: Statistical, rolling-window and new-resource detection
//! - `scoring`: Score normalization, severity classification, recommendations
//!
//! ## Usage
//!
//! ```rust
//! use finops_cost_intelligence::{AnomalyDetector, AnomalyDetectorConfig};
//!
//! let detector = AnomalyDetector::new(AnomalyDetectorConfig::default())?;
//! let anomalies = detector.detect_anomalies(&[]);
//! assert!(anomalies.is_empty());
//! # Ok::<(), finops_cost_intelligence::CostIntelligenceError>(())
//! ```

pub mod methods;
pub mod scoring;
pub mod types;

pub use scoring::{classify_severity, normalized_score, recommendations_for, relative_impact};
pub use types::*;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::error::CostIntelligenceResult;
use crate::statistics::percent_change;
use crate::types::{stable_id, TimeSeriesPoint};
use types::Detection;
use methods::{detect_new_resource, detect_statistical, detect_time_series, ResourceSeries};

/// Minimum number of points across all resources before detection runs
pub const MIN_TOTAL_POINTS: usize = 7;

/// Cost anomaly detector
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    /// Configuration
    config: AnomalyDetectorConfig,
}

impl AnomalyDetector {
    /// Create a new anomaly detector, rejecting out-of-range configuration
    pub fn new(config: AnomalyDetectorConfig) -> CostIntelligenceResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &AnomalyDetectorConfig {
        &self.config
    }

    /// Detect anomalies using the current time as the reference clock
    pub fn detect_anomalies(&self, points: &[TimeSeriesPoint]) -> Vec<AnomalyResult> {
        self.detect_anomalies_at(points, Utc::now())
    }

    /// Detect anomalies against a fixed reference clock
    pub fn detect_anomalies_at(
        &self,
        points: &[TimeSeriesPoint],
        now: DateTime<Utc>,
    ) -> Vec<AnomalyResult> {
        if points.len() < MIN_TOTAL_POINTS {
            warn!(
                "Insufficient data for anomaly detection: {} < {} points",
                points.len(),
                MIN_TOTAL_POINTS
            );
            return Vec::new();
        }

        info!("Detecting anomalies across {} points", points.len());

        let mut groups: IndexMap<&str, Vec<&TimeSeriesPoint>> = IndexMap::new();
        for point in points {
            groups.entry(point.resource_id.as_str()).or_default().push(point);
        }

        let mut results = Vec::new();
        for (resource_id, group) in groups {
            let dropped = group.iter().filter(|p| !p.value.is_finite()).count();
            if dropped > 0 {
                debug!("Dropping {} non-finite values for resource {}", dropped, resource_id);
            }

            let series = ResourceSeries::prepare(
                resource_id,
                group,
                self.config.window_days,
                self.config.seasonal_adjustment,
            );
            results.extend(self.analyze_series(&series, now));
        }

        let mut results: Vec<AnomalyResult> = results
            .into_iter()
            .filter(|r| r.score >= self.config.threshold)
            .collect();
        sort_results(&mut results);

        info!("Detected {} anomalies", results.len());
        results
    }

    /// Summarize a set of anomaly results
    pub fn summarize(&self, anomalies: &[AnomalyResult]) -> AnomalySummary {
        let mut summary = AnomalySummary {
            total: anomalies.len(),
            ..Default::default()
        };

        let mut resources = HashSet::new();
        for anomaly in anomalies {
            *summary.by_severity.entry(anomaly.severity).or_insert(0) += 1;
            *summary.by_type.entry(anomaly.anomaly_type).or_insert(0) += 1;
            if anomaly.impact.cost_impact > 0.0 {
                summary.total_cost_impact += anomaly.impact.cost_impact;
            }
            summary.highest_score = summary.highest_score.max(anomaly.score);
            resources.insert(anomaly.resource_id.as_str());
        }
        summary.affected_resources = resources.len();

        summary
    }

    fn analyze_series(&self, series: &ResourceSeries<'_>, now: DateTime<Utc>) -> Vec<AnomalyResult> {
        let sensitivity = self.config.sensitivity;
        let historical_average = series.historical_average();

        let mut detections = Vec::new();
        for method in &self.config.methods {
            let found = match method {
                DetectionMethod::Statistical => detect_statistical(series, sensitivity),
                DetectionMethod::TimeSeries => detect_time_series(series, sensitivity),
                DetectionMethod::Pattern => detect_new_resource(series, now),
            };
            debug!(
                "{} method found {} candidates for {}",
                method,
                found.len(),
                series.resource_id
            );
            detections.extend(found);
        }

        detections
            .into_iter()
            .map(|d| build_result(series, d, historical_average))
            .collect()
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self {
            config: AnomalyDetectorConfig::default(),
        }
    }
}

fn build_result(
    series: &ResourceSeries<'_>,
    detection: Detection,
    historical_average: f64,
) -> AnomalyResult {
    let expected = detection.expected;
    let actual = detection.actual;

    let severity = detection
        .fixed_severity
        .unwrap_or_else(|| classify_severity(detection.magnitude, actual, expected));

    let method = detection.method.to_string();
    let timestamp = detection.timestamp.to_rfc3339();
    let id = stable_id(&[method.as_str(), series.resource_id, timestamp.as_str()]);

    let description = match detection.anomaly_type {
        AnomalyType::NewResource => format!(
            "New {} resource {} started incurring cost ({:.2})",
            series.service_name, series.resource_id, actual
        ),
        anomaly_type => format!(
            "{} on {}: actual cost {:.2} vs expected {:.2}",
            anomaly_type, series.resource_id, actual, expected
        ),
    };

    let mut metadata = HashMap::new();
    if detection.magnitude.is_finite() && detection.fixed_severity.is_none() {
        let key = match detection.method {
            DetectionMethod::Statistical => "zScore",
            _ => "deviation",
        };
        metadata.insert(key.to_string(), serde_json::json!(detection.magnitude));
    }
    if let Some(window) = detection.window {
        metadata.insert("rollingWindow".to_string(), serde_json::json!(window));
    }
    if series.seasonally_adjusted {
        metadata.insert(
            "seasonalFactor".to_string(),
            serde_json::json!(detection.seasonal_factor),
        );
    }

    AnomalyResult {
        id,
        timestamp: detection.timestamp,
        resource_id: series.resource_id.to_string(),
        service_name: series.service_name.clone(),
        anomaly_type: detection.anomaly_type,
        severity,
        score: detection.score.clamp(0.0, 1.0),
        description,
        impact: AnomalyImpact {
            cost_impact: actual - expected,
            percentage_increase: percent_change(expected, actual),
        },
        context: AnomalyContext {
            expected_cost: expected,
            actual_cost: actual,
            historical_average,
            method: detection.method,
        },
        recommendations: recommendations_for(
            detection.anomaly_type,
            actual,
            expected,
            &series.service_name,
        ),
        metadata,
    }
}

/// Stable sort by severity then score, both descending
fn sort_results(results: &mut [AnomalyResult]) {
    results.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| b.score.total_cmp(&a.score))
    });
}
