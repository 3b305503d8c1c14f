//! Name patterns for AI/ML spend
//!
//! Category rules are evaluated in table order and the first match wins.

use super::types::AiCategory;
use crate::types::ResourceAnalysis;

/// A single category rule
#[derive(Clone, Copy)]
pub struct AiCategoryRule {
    /// Category reported on match
    pub category: AiCategory,
    pub(crate) matches: fn(&ResourceAnalysis) -> bool,
}

impl std::fmt::Debug for AiCategoryRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiCategoryRule")
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// Category rules in evaluation order
pub static AI_CATEGORY_RULES: &[AiCategoryRule] = &[
    AiCategoryRule {
        category: AiCategory::LlmInference,
        matches: is_llm_inference,
    },
    AiCategoryRule {
        category: AiCategory::MlTraining,
        matches: is_ml_training,
    },
    AiCategoryRule {
        category: AiCategory::GpuCompute,
        matches: is_gpu_compute,
    },
    AiCategoryRule {
        category: AiCategory::VectorDatabase,
        matches: is_vector_database,
    },
    AiCategoryRule {
        category: AiCategory::AiServices,
        matches: is_ai_service,
    },
];

const LLM_MARKERS: &[&str] = &[
    "openai",
    "azure openai",
    "bedrock",
    "anthropic",
    "gemini",
    "cognitive services",
];
const TRAINING_MARKERS: &[&str] = &["machine learning", "sagemaker", "vertex ai", "databricks"];
const VECTOR_MARKERS: &[&str] = &["pinecone", "ai search", "cognitive search", "vector"];
const AI_SERVICE_MARKERS: &[&str] = &[
    "speech",
    "vision",
    "translator",
    "document intelligence",
    "form recognizer",
];

/// GPU families named by a series prefix followed by a size digit (`NC6s`, `ND96asr`)
const GPU_SERIES_PREFIXES: &[&str] = &["nc", "nd", "nv"];
/// GPU instance families matched at the start of a name token (`p3.2xlarge`, `g4dn.xlarge`)
const GPU_FAMILY_PREFIXES: &[&str] = &["p3", "p4", "g4dn"];
/// Accelerator names matched anywhere
const GPU_ACCELERATORS: &[&str] = &["a100", "h100", "gpu"];

/// Provider markers in priority order
const PROVIDER_MARKERS: &[(&str, &str)] = &[
    ("azure", "Azure"),
    ("microsoft", "Azure"),
    ("aws", "AWS"),
    ("amazon", "AWS"),
    ("bedrock", "AWS"),
    ("sagemaker", "AWS"),
    ("gcp", "GCP"),
    ("google", "GCP"),
    ("vertex", "GCP"),
    ("openai", "OpenAI"),
    ("anthropic", "Anthropic"),
];

/// Model markers in priority order
const MODEL_MARKERS: &[(&str, &str)] = &[
    ("gpt-4o", "gpt-4o"),
    ("gpt-4", "gpt-4"),
    ("gpt-35", "gpt-3.5"),
    ("gpt-3.5", "gpt-3.5"),
    ("claude", "claude"),
    ("llama", "llama"),
    ("gemini", "gemini"),
    ("embedding", "embedding"),
];

fn contains_any(haystack: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| haystack.contains(m))
}

fn all_names(resource: &ResourceAnalysis) -> String {
    format!(
        "{} {} {} {}",
        resource.service_name, resource.service_category, resource.resource_name, resource.resource_type
    )
    .to_lowercase()
}

fn is_llm_inference(resource: &ResourceAnalysis) -> bool {
    contains_any(&resource.service_haystack(), LLM_MARKERS)
}

fn is_ml_training(resource: &ResourceAnalysis) -> bool {
    contains_any(&resource.service_haystack(), TRAINING_MARKERS)
}

fn is_vector_database(resource: &ResourceAnalysis) -> bool {
    contains_any(&all_names(resource), VECTOR_MARKERS)
}

fn is_ai_service(resource: &ResourceAnalysis) -> bool {
    contains_any(&resource.service_haystack(), AI_SERVICE_MARKERS)
}

fn is_gpu_compute(resource: &ResourceAnalysis) -> bool {
    let names = format!("{} {}", resource.resource_name, resource.resource_type).to_lowercase();
    contains_any(&names, GPU_ACCELERATORS) || names.split(|c: char| !c.is_ascii_alphanumeric()).any(is_gpu_token)
}

/// Whether a single alphanumeric name token names a GPU SKU
pub fn is_gpu_token(token: &str) -> bool {
    let series = GPU_SERIES_PREFIXES.iter().any(|prefix| {
        token
            .strip_prefix(prefix)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_digit())
    });

    series
        || GPU_FAMILY_PREFIXES.iter().any(|prefix| {
            token
                .strip_prefix(prefix)
                .is_some_and(|rest| !rest.starts_with(|c: char| c.is_ascii_digit()))
        })
}

/// Provider named anywhere in the resource's names
pub fn provider_for(resource: &ResourceAnalysis) -> Option<&'static str> {
    let names = all_names(resource);
    PROVIDER_MARKERS
        .iter()
        .find(|(marker, _)| names.contains(marker))
        .map(|(_, provider)| *provider)
}

/// Model family named in the resource name or type
pub fn model_for(resource: &ResourceAnalysis) -> Option<&'static str> {
    let names = format!("{} {}", resource.resource_name, resource.resource_type).to_lowercase();
    MODEL_MARKERS
        .iter()
        .find(|(marker, _)| names.contains(marker))
        .map(|(_, model)| *model)
}
