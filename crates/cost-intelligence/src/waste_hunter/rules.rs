//! Waste detection rule table
//!
//! Rules run in table order. Each rule sees one resource summary and the
//! hunter configuration and either returns a [`RuleMatch`] or nothing.

use super::types::{Evidence, Recommendation, RuleMatch, WasteCategory, WasteHunterConfig};
use crate::statistics::coefficient_of_variation;
use crate::types::{ImplementationEffort, ResourceAnalysis, Severity};

/// A single detection rule
#[derive(Clone, Copy)]
pub struct WasteRule {
    /// Category reported when the rule fires
    pub category: WasteCategory,
    pub(crate) detect: fn(&ResourceAnalysis, &WasteHunterConfig) -> Option<RuleMatch>,
}

impl std::fmt::Debug for WasteRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WasteRule")
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// Rules in evaluation order
pub static WASTE_RULES: &[WasteRule] = &[
    WasteRule {
        category: WasteCategory::Idle,
        detect: detect_idle_compute,
    },
    WasteRule {
        category: WasteCategory::Untagged,
        detect: detect_untagged,
    },
    WasteRule {
        category: WasteCategory::StaleSnapshot,
        detect: detect_stale_snapshot,
    },
    WasteRule {
        category: WasteCategory::UnusedStorage,
        detect: detect_unused_storage,
    },
    WasteRule {
        category: WasteCategory::IdleDatabase,
        detect: detect_idle_database,
    },
    WasteRule {
        category: WasteCategory::OldGeneration,
        detect: detect_old_generation,
    },
    WasteRule {
        category: WasteCategory::UnusedIp,
        detect: detect_unused_ip,
    },
    WasteRule {
        category: WasteCategory::IdleLoadBalancer,
        detect: detect_idle_load_balancer,
    },
];

const COMPUTE_MARKERS: &[&str] = &["virtual machine", "compute", "ec2", "instance", "vm"];
const SNAPSHOT_MARKERS: &[&str] = &["snapshot", "backup"];
const STORAGE_MARKERS: &[&str] = &["storage", "disk", "blob", "s3", "ebs"];
const DISK_MARKERS: &[&str] = &["disk", "ebs"];
const DATABASE_MARKERS: &[&str] = &["sql", "database", "rds", "cosmos", "mysql", "postgres"];
const PUBLIC_IP_MARKERS: &[&str] = &["public ip", "ip address", "elastic ip"];
const LOAD_BALANCER_MARKERS: &[&str] = &["load balancer", "application gateway", "nat gateway"];
const LEGACY_SKU_PREFIXES: &[&str] = &[
    "standard_a", "basic_a", "standard_g", "m1.", "m2.", "m3.", "c1.", "c3.", "t1.", "r3.", "i2.",
    "n1-",
];

/// Tags every resource is expected to carry for cost allocation
pub const CRITICAL_TAGS: &[&str] = &["environment", "owner", "cost-center", "project", "application"];

/// Severity from the size of the potential savings
pub fn severity_for_savings(potential_savings: f64) -> Severity {
    if potential_savings >= 1000.0 {
        Severity::Critical
    } else if potential_savings >= 500.0 {
        Severity::High
    } else if potential_savings >= 100.0 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn contains_any(haystack: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| haystack.contains(m))
}

fn name_haystack(resource: &ResourceAnalysis) -> String {
    format!("{} {}", resource.resource_name, resource.resource_type).to_lowercase()
}

fn active_days(resource: &ResourceAnalysis) -> u32 {
    resource.active_days() as u32
}

fn active_days_evidence(days: u32) -> Evidence {
    Evidence::new("active-days", format!("Billed on {days} days"), f64::from(days))
}

fn usage_evidence(resource: &ResourceAnalysis) -> Evidence {
    Evidence::new(
        "usage-quantity",
        format!(
            "{:.2} {} consumed over the window",
            resource.usage_quantity, resource.pricing_unit
        ),
        resource.usage_quantity,
    )
}

fn detect_idle_compute(resource: &ResourceAnalysis, config: &WasteHunterConfig) -> Option<RuleMatch> {
    if !contains_any(&resource.service_haystack(), COMPUTE_MARKERS) {
        return None;
    }

    let days = active_days(resource);
    if days < config.idle_threshold_days {
        return None;
    }

    let usage = resource.usage_quantity;
    let utilization = usage / (f64::from(days) * 24.0) * 100.0;
    if usage >= 100.0 && utilization >= config.utilization_threshold {
        return None;
    }

    let potential_savings = resource.total_cost * 0.7;
    Some(RuleMatch {
        severity: severity_for_savings(potential_savings),
        confidence: if usage < 10.0 { 85.0 } else { 70.0 },
        reason: format!(
            "Compute resource billed for {days} days with {utilization:.1}% estimated utilization"
        ),
        potential_savings,
        evidence: vec![
            active_days_evidence(days),
            usage_evidence(resource),
            Evidence::new(
                "utilization",
                format!("Estimated utilization {utilization:.1}%"),
                utilization,
            ),
        ],
        recommendations: vec![
            Recommendation::new(
                "stop-or-deallocate",
                "Stop or deallocate the instance when it is not needed",
                ImplementationEffort::Low,
                potential_savings,
            ),
            Recommendation::new(
                "downsize",
                "Move the workload to a smaller instance size",
                ImplementationEffort::Medium,
                resource.total_cost * 0.35,
            ),
        ],
        days_since_activity: Some(days),
    })
}

fn detect_untagged(resource: &ResourceAnalysis, _config: &WasteHunterConfig) -> Option<RuleMatch> {
    let missing: Vec<&str> = CRITICAL_TAGS
        .iter()
        .copied()
        .filter(|tag| resource.tag(tag).map_or(true, |v| v.trim().is_empty()))
        .collect();

    if missing.len() < 3 || resource.total_cost <= 50.0 {
        return None;
    }

    let potential_savings = resource.total_cost * 0.1;
    Some(RuleMatch {
        severity: severity_for_savings(potential_savings).min(Severity::Medium),
        confidence: 95.0,
        reason: format!("Missing {} cost allocation tags", missing.len()),
        potential_savings,
        evidence: vec![Evidence::new(
            "missing-tags",
            format!("Missing tags: {}", missing.join(", ")),
            missing.len() as f64,
        )],
        recommendations: vec![Recommendation::new(
            "apply-tags",
            format!("Apply the {} tags so the cost can be allocated", missing.join(", ")),
            ImplementationEffort::Low,
            potential_savings,
        )],
        days_since_activity: None,
    })
}

fn detect_stale_snapshot(resource: &ResourceAnalysis, config: &WasteHunterConfig) -> Option<RuleMatch> {
    let matches = contains_any(&resource.service_haystack(), SNAPSHOT_MARKERS)
        || contains_any(&name_haystack(resource), SNAPSHOT_MARKERS);
    if !matches {
        return None;
    }

    let span = resource.billed_span_days();
    let min_age = config.analysis_window_days.min(30);
    if span < min_age {
        return None;
    }

    let potential_savings = resource.total_cost * 0.8;
    Some(RuleMatch {
        severity: severity_for_savings(potential_savings),
        confidence: 75.0,
        reason: format!("Snapshot or backup retained and billed for {span} days"),
        potential_savings,
        evidence: vec![Evidence::new(
            "billed-span",
            format!("Billed across {span} days"),
            f64::from(span),
        )],
        recommendations: vec![
            Recommendation::new(
                "delete-snapshot",
                "Delete snapshots that are no longer required",
                ImplementationEffort::Low,
                potential_savings,
            ),
            Recommendation::new(
                "retention-policy",
                "Add a retention policy so old snapshots expire automatically",
                ImplementationEffort::Medium,
                potential_savings,
            ),
        ],
        days_since_activity: Some(span),
    })
}

fn detect_unused_storage(resource: &ResourceAnalysis, config: &WasteHunterConfig) -> Option<RuleMatch> {
    let haystack = resource.service_haystack();
    if !contains_any(&haystack, STORAGE_MARKERS) {
        return None;
    }

    let days = active_days(resource);
    let zero_usage = resource.usage_quantity == 0.0 && resource.total_cost > 0.0;

    let (savings_ratio, confidence, reason) = if zero_usage {
        let ratio = if contains_any(&haystack, DISK_MARKERS) { 0.9 } else { 0.5 };
        (ratio, 80.0, "Storage billed with no recorded usage".to_string())
    } else {
        let active: Vec<f64> = resource
            .daily_costs
            .iter()
            .filter(|d| d.cost > 0.0)
            .map(|d| d.cost)
            .collect();
        let cv = coefficient_of_variation(&active);
        let flat = days >= config.idle_threshold_days && cv < 0.05 && resource.usage_quantity < 1.0;
        if !flat {
            return None;
        }
        (
            0.5,
            60.0,
            format!("Flat storage cost over {days} days with negligible usage"),
        )
    };

    let potential_savings = resource.total_cost * savings_ratio;
    Some(RuleMatch {
        severity: severity_for_savings(potential_savings),
        confidence,
        reason,
        potential_savings,
        evidence: vec![active_days_evidence(days), usage_evidence(resource)],
        recommendations: vec![
            Recommendation::new(
                "delete-or-archive",
                "Delete the storage or move its data to an archive tier",
                ImplementationEffort::Low,
                potential_savings,
            ),
            Recommendation::new(
                "lifecycle-policy",
                "Configure a lifecycle policy for unused data",
                ImplementationEffort::Medium,
                resource.total_cost * 0.3,
            ),
        ],
        days_since_activity: Some(days),
    })
}

fn detect_idle_database(resource: &ResourceAnalysis, config: &WasteHunterConfig) -> Option<RuleMatch> {
    if !contains_any(&resource.service_haystack(), DATABASE_MARKERS) {
        return None;
    }

    let days = active_days(resource);
    if days < config.idle_threshold_days || resource.usage_quantity >= 100.0 {
        return None;
    }

    let potential_savings = resource.total_cost * 0.6;
    Some(RuleMatch {
        severity: severity_for_savings(potential_savings),
        confidence: 65.0,
        reason: format!("Database billed for {days} days with minimal activity"),
        potential_savings,
        evidence: vec![active_days_evidence(days), usage_evidence(resource)],
        recommendations: vec![
            Recommendation::new(
                "scale-down",
                "Scale the database to a lower tier or serverless",
                ImplementationEffort::Medium,
                potential_savings,
            ),
            Recommendation::new(
                "pause-or-delete",
                "Pause or delete the database if it is no longer used",
                ImplementationEffort::Low,
                resource.total_cost,
            ),
        ],
        days_since_activity: Some(days),
    })
}

fn detect_old_generation(resource: &ResourceAnalysis, _config: &WasteHunterConfig) -> Option<RuleMatch> {
    let haystack = name_haystack(resource);
    let prefix = LEGACY_SKU_PREFIXES.iter().find(|p| haystack.contains(*p))?;

    let potential_savings = resource.total_cost * 0.2;
    Some(RuleMatch {
        severity: severity_for_savings(potential_savings),
        confidence: 80.0,
        reason: format!("Resource runs on a previous-generation SKU ({prefix})"),
        potential_savings,
        evidence: vec![Evidence::new(
            "legacy-sku-cost",
            format!(
                "{:.2} billed on a SKU matching legacy marker {prefix}",
                resource.total_cost
            ),
            resource.total_cost,
        )],
        recommendations: vec![Recommendation::new(
            "migrate-generation",
            "Migrate to the current generation of the same family",
            ImplementationEffort::Medium,
            potential_savings,
        )],
        days_since_activity: None,
    })
}

fn detect_unused_ip(resource: &ResourceAnalysis, config: &WasteHunterConfig) -> Option<RuleMatch> {
    if !contains_any(&resource.service_haystack(), PUBLIC_IP_MARKERS) {
        return None;
    }

    let days = active_days(resource);
    if days < config.idle_threshold_days || resource.usage_quantity >= 100.0 {
        return None;
    }

    let potential_savings = resource.total_cost;
    Some(RuleMatch {
        severity: severity_for_savings(potential_savings),
        confidence: 60.0,
        reason: format!("Public IP allocated for {days} days with little usage"),
        potential_savings,
        evidence: vec![active_days_evidence(days), usage_evidence(resource)],
        recommendations: vec![Recommendation::new(
            "release-ip",
            "Release the address if nothing is associated with it",
            ImplementationEffort::Low,
            potential_savings,
        )],
        days_since_activity: Some(days),
    })
}

fn detect_idle_load_balancer(
    resource: &ResourceAnalysis,
    config: &WasteHunterConfig,
) -> Option<RuleMatch> {
    if !contains_any(&resource.service_haystack(), LOAD_BALANCER_MARKERS) {
        return None;
    }

    let days = active_days(resource);
    if days < config.idle_threshold_days || resource.usage_quantity >= 1.0 {
        return None;
    }

    let potential_savings = resource.total_cost * 0.9;
    Some(RuleMatch {
        severity: severity_for_savings(potential_savings),
        confidence: 70.0,
        reason: format!("Load balancer billed for {days} days with no processed data"),
        potential_savings,
        evidence: vec![active_days_evidence(days), usage_evidence(resource)],
        recommendations: vec![Recommendation::new(
            "remove-load-balancer",
            "Remove the load balancer or gateway if no backends depend on it",
            ImplementationEffort::Medium,
            potential_savings,
        )],
        days_since_activity: Some(days),
    })
}
