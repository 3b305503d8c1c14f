//! AI/ML spend classification

pub mod patterns;
pub mod types;

pub use patterns::{is_gpu_token, model_for, provider_for, AiCategoryRule, AI_CATEGORY_RULES};
pub use types::*;

use tracing::{debug, info};

use crate::types::{unknown, ResourceAnalysis};

/// Classifies resources into AI spend categories
#[derive(Debug, Clone, Default)]
pub struct AiSpendClassifier;

impl AiSpendClassifier {
    /// Create a classifier over the built-in pattern table
    pub fn new() -> Self {
        Self
    }

    /// Classify a single resource, `None` when it is not AI spend
    pub fn classify(&self, resource: &ResourceAnalysis) -> Option<AiClassification> {
        let rule = AI_CATEGORY_RULES.iter().find(|rule| (rule.matches)(resource))?;
        Some(AiClassification {
            category: rule.category,
            provider: provider_for(resource).map_or_else(unknown, str::to_string),
            model: model_for(resource).map(str::to_string),
        })
    }

    /// Aggregate AI spend across resources
    pub fn analyze(&self, resources: &[ResourceAnalysis]) -> AiSpendReport {
        let mut report = AiSpendReport::default();

        for resource in resources {
            if !resource.total_cost.is_finite() {
                debug!("Skipping resource {} with non-finite cost", resource.resource_id);
                continue;
            }
            report.total_spend += resource.total_cost;

            let Some(classification) = self.classify(resource) else {
                continue;
            };
            let cost = resource.total_cost;
            report.total_ai_spend += cost;
            report.resources_classified += 1;
            *report.by_category.entry(classification.category).or_insert(0.0) += cost;
            *report.by_provider.entry(classification.provider).or_insert(0.0) += cost;
            if let Some(model) = classification.model {
                *report.by_model.entry(model).or_insert(0.0) += cost;
            }
        }

        report.ai_share_percent = if report.total_spend > 0.0 {
            report.total_ai_spend / report.total_spend * 100.0
        } else {
            0.0
        };

        info!(
            "Classified {} of {} resources as AI spend",
            report.resources_classified,
            resources.len()
        );
        report
    }
}
