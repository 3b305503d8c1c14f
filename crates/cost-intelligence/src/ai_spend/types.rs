//! AI spend classification types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// AI/ML spend category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AiCategory {
    /// Hosted model inference APIs
    LlmInference,
    /// Managed training platforms
    MlTraining,
    /// GPU instances
    GpuCompute,
    /// Vector and semantic search stores
    VectorDatabase,
    /// Task-specific AI APIs (speech, vision, documents)
    AiServices,
}

impl std::fmt::Display for AiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AiCategory::LlmInference => "llm-inference",
            AiCategory::MlTraining => "ml-training",
            AiCategory::GpuCompute => "gpu-compute",
            AiCategory::VectorDatabase => "vector-database",
            AiCategory::AiServices => "ai-services",
        };
        write!(f, "{name}")
    }
}

/// Classification of a single resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiClassification {
    /// Category
    pub category: AiCategory,
    /// Provider, `"Unknown"` when no marker matched
    pub provider: String,
    /// Model family when the name identifies one
    pub model: Option<String>,
}

/// AI spend roll-up
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSpendReport {
    /// Spend on classified resources
    pub total_ai_spend: f64,
    /// Spend on all resources
    pub total_spend: f64,
    /// AI share of total spend in percent
    pub ai_share_percent: f64,
    /// Spend per category
    pub by_category: BTreeMap<AiCategory, f64>,
    /// Spend per model family
    pub by_model: BTreeMap<String, f64>,
    /// Spend per provider
    pub by_provider: BTreeMap<String, f64>,
    /// Number of resources classified as AI
    pub resources_classified: usize,
}
