//! Scoring, severity classification and recommendation templates
//!
//! Severity is classified from the raw deviation magnitude (|z| or rolling
//! deviation in standard deviations), not from the normalized `[0, 1]`
//! score stored on the result. Both units are kept deliberately.

use super::types::AnomalyType;
use crate::types::Severity;

/// Divisor mapping a raw magnitude onto the `[0, 1]` score
const SCORE_SCALE: f64 = 5.0;

/// Normalize a raw magnitude to `[0, 1]`
pub fn normalized_score(magnitude: f64) -> f64 {
    if magnitude.is_nan() {
        return 0.0;
    }
    (magnitude.abs() / SCORE_SCALE).min(1.0)
}

/// Relative impact `|actual - expected| / expected`.
///
/// A zero expectation yields `1.0` when the actual cost is positive and
/// `0.0` otherwise.
pub fn relative_impact(actual: f64, expected: f64) -> f64 {
    if expected == 0.0 {
        return if actual > 0.0 { 1.0 } else { 0.0 };
    }
    ((actual - expected) / expected).abs()
}

/// Classify severity from the raw magnitude and relative impact
pub fn classify_severity(magnitude: f64, actual: f64, expected: f64) -> Severity {
    let rel = relative_impact(actual, expected);
    if magnitude > 4.0 || rel > 2.0 {
        Severity::Critical
    } else if magnitude > 3.0 || rel > 1.0 {
        Severity::High
    } else if magnitude > 2.0 || rel > 0.5 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Recommendation templates for a finding
pub fn recommendations_for(
    anomaly_type: AnomalyType,
    actual: f64,
    expected: f64,
    service_name: &str,
) -> Vec<String> {
    if anomaly_type == AnomalyType::NewResource {
        return vec![
            format!("Confirm the new {service_name} resource was provisioned intentionally"),
            "Tag the resource with an owner and cost center".to_string(),
            "Add the resource to budget alerting".to_string(),
        ];
    }

    if actual > expected * 1.5 {
        vec![
            format!("Investigate recent deployments or configuration changes affecting {service_name}"),
            "Review autoscaling policies and resource limits".to_string(),
            "Set a budget alert to catch further increases early".to_string(),
        ]
    } else if actual < expected * 0.5 {
        vec![
            "Verify the resource is still operating as expected".to_string(),
            "Check for failed jobs, stopped services or expired commitments".to_string(),
            "Confirm whether the cost reduction was intentional".to_string(),
        ]
    } else {
        vec![
            "Monitor the resource for continued deviation".to_string(),
            "Compare against usage metrics for the same period".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_score_bounds() {
        assert_eq!(normalized_score(0.0), 0.0);
        assert_eq!(normalized_score(2.5), 0.5);
        assert_eq!(normalized_score(-2.5), 0.5);
        assert_eq!(normalized_score(12.0), 1.0);
        assert_eq!(normalized_score(f64::INFINITY), 1.0);
        assert_eq!(normalized_score(f64::NAN), 0.0);
    }

    #[test]
    fn test_relative_impact_zero_expected() {
        assert_eq!(relative_impact(10.0, 0.0), 1.0);
        assert_eq!(relative_impact(0.0, 0.0), 0.0);
        assert_eq!(relative_impact(30.0, 10.0), 2.0);
        assert_eq!(relative_impact(5.0, 10.0), 0.5);
    }

    #[test]
    fn test_severity_from_magnitude() {
        assert_eq!(classify_severity(4.5, 10.0, 10.0), Severity::Critical);
        assert_eq!(classify_severity(3.5, 10.0, 10.0), Severity::High);
        assert_eq!(classify_severity(2.5, 10.0, 10.0), Severity::Medium);
        assert_eq!(classify_severity(1.0, 10.0, 10.0), Severity::Low);
        assert_eq!(classify_severity(f64::INFINITY, 10.0, 10.0), Severity::Critical);
    }

    #[test]
    fn test_severity_from_relative_impact() {
        assert_eq!(classify_severity(0.0, 31.0, 10.0), Severity::Critical);
        assert_eq!(classify_severity(0.0, 21.0, 10.0), Severity::High);
        assert_eq!(classify_severity(0.0, 16.0, 10.0), Severity::Medium);
        assert_eq!(classify_severity(0.0, 12.0, 10.0), Severity::Low);
    }

    #[test]
    fn test_severity_uses_raw_magnitude_not_score() {
        // A normalized score never exceeds 1, a raw magnitude of 4.2 does
        let magnitude = 4.2;
        assert!(normalized_score(magnitude) <= 1.0);
        assert_eq!(classify_severity(magnitude, 10.0, 10.0), Severity::Critical);
        assert_eq!(
            classify_severity(normalized_score(magnitude), 10.0, 10.0),
            Severity::Low
        );
    }

    #[test]
    fn test_recommendation_templates() {
        let spike = recommendations_for(AnomalyType::CostSpike, 100.0, 10.0, "Storage");
        assert!(spike[0].contains("Storage"));
        assert!(spike[0].starts_with("Investigate"));

        let drop = recommendations_for(AnomalyType::CostDrop, 2.0, 10.0, "Storage");
        assert!(drop[0].starts_with("Verify"));

        let mild = recommendations_for(AnomalyType::CostSpike, 12.0, 10.0, "Storage");
        assert!(mild[0].starts_with("Monitor"));

        let new = recommendations_for(AnomalyType::NewResource, 5.0, 0.0, "Functions");
        assert!(new[0].contains("Functions"));
        assert_eq!(new.len(), 3);
    }
}
