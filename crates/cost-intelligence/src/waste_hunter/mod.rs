//! Rule-based waste detection over per-resource cost summaries
//!
//! Every resource above the cost floor is evaluated against the enabled
//! rules in [`rules::WASTE_RULES`]; each rule that fires yields one
//! [`WasteOpportunity`].

pub mod rules;
pub mod summary;
pub mod types;

pub use rules::{severity_for_savings, WasteRule, CRITICAL_TAGS, WASTE_RULES};
pub use summary::is_quick_win;
pub use types::*;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::CostIntelligenceResult;
use crate::types::{stable_id, ResourceAnalysis};
use types::RuleMatch;

/// Waste hunter engine
#[derive(Debug, Clone)]
pub struct WasteHunter {
    /// Configuration
    config: WasteHunterConfig,
}

impl WasteHunter {
    /// Create a new waste hunter, rejecting out-of-range configuration
    pub fn new(config: WasteHunterConfig) -> CostIntelligenceResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &WasteHunterConfig {
        &self.config
    }

    /// Analyze resources, stamping opportunities with the current time
    pub fn analyze_resources(&self, resources: &[ResourceAnalysis]) -> Vec<WasteOpportunity> {
        self.analyze_resources_at(resources, Utc::now())
    }

    /// Analyze resources with a fixed detection time
    pub fn analyze_resources_at(
        &self,
        resources: &[ResourceAnalysis],
        now: DateTime<Utc>,
    ) -> Vec<WasteOpportunity> {
        info!("Hunting waste across {} resources", resources.len());

        let rules: Vec<&WasteRule> = WASTE_RULES
            .iter()
            .filter(|rule| self.config.categories.contains(&rule.category))
            .collect();

        let mut opportunities = Vec::new();
        for resource in resources {
            if !resource.total_cost.is_finite() {
                debug!("Skipping resource {} with non-finite cost", resource.resource_id);
                continue;
            }
            if resource.total_cost < self.config.min_cost_threshold {
                continue;
            }

            for rule in &rules {
                if let Some(found) = (rule.detect)(resource, &self.config) {
                    debug!("Rule {} matched resource {}", rule.category, resource.resource_id);
                    opportunities.push(build_opportunity(resource, rule.category, found, now));
                }
            }
        }

        opportunities.sort_by(|a, b| b.potential_savings.total_cmp(&a.potential_savings));

        info!("Found {} waste opportunities", opportunities.len());
        opportunities
    }

    /// Summarize opportunities, stamped with the current time
    pub fn generate_summary(
        &self,
        opportunities: &[WasteOpportunity],
        data_range: DataRange,
    ) -> WasteSummary {
        self.generate_summary_at(opportunities, data_range, Utc::now())
    }

    /// Summarize opportunities with a fixed generation time
    pub fn generate_summary_at(
        &self,
        opportunities: &[WasteOpportunity],
        data_range: DataRange,
        generated_at: DateTime<Utc>,
    ) -> WasteSummary {
        summary::summarize(opportunities, data_range, generated_at)
    }
}

impl Default for WasteHunter {
    fn default() -> Self {
        Self {
            config: WasteHunterConfig::default(),
        }
    }
}

fn build_opportunity(
    resource: &ResourceAnalysis,
    category: WasteCategory,
    found: RuleMatch,
    now: DateTime<Utc>,
) -> WasteOpportunity {
    let potential_savings = found.potential_savings.max(0.0);
    let savings_percent = if resource.total_cost > 0.0 {
        potential_savings / resource.total_cost * 100.0
    } else {
        0.0
    };

    let rule = category.to_string();
    WasteOpportunity {
        id: stable_id(&[rule.as_str(), resource.resource_id.as_str()]),
        category,
        severity: found.severity,
        resource_id: resource.resource_id.clone(),
        resource_name: resource.resource_name.clone(),
        resource_type: resource.resource_type.clone(),
        service_name: resource.service_name.clone(),
        region: resource.region.clone(),
        current_cost: resource.total_cost,
        potential_savings,
        savings_percent,
        confidence: found.confidence.clamp(0.0, 100.0),
        reason: found.reason,
        evidence: found.evidence,
        recommendations: found.recommendations,
        detected_at: now,
        days_since_activity: found.days_since_activity,
        tags: resource.tags.clone(),
    }
}
