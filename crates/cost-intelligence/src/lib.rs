//! Cost intelligence engines for cloud billing data
//!
//! This crate turns aggregated billing records into findings:
//! - Cost anomaly detection (statistical, rolling-window and new-resource)
//! - Rule-based waste hunting with savings estimates
//! - Savings scenario simulation for common optimization strategies
//! - AI/ML spend classification
//!
//! Engines are synchronous and hold only immutable configuration. They never
//! fetch, persist or schedule anything; callers hand in records already
//! shaped by their query layer and render the returned values.

#![warn(missing_docs)]

pub mod ai_spend;
pub mod anomaly_detector;
pub mod config;
pub mod error;
pub mod savings_simulator;
pub mod statistics;
pub mod types;
pub mod waste_hunter;

pub use config::CostIntelligenceConfig;
pub use error::{CostIntelligenceError, CostIntelligenceResult};

// Shared records
pub use types::{
    DailyCost, ImplementationEffort, ResourceAnalysis, RiskLevel, Severity, TimeSeriesPoint,
};

// Anomaly detection
pub use anomaly_detector::{
    AnomalyContext, AnomalyDetector, AnomalyDetectorConfig, AnomalyImpact, AnomalyResult,
    AnomalySummary, AnomalyType, DetectionMethod,
};

// Waste hunting
pub use waste_hunter::{
    CategoryBreakdown, DataRange, Evidence, Recommendation, ServiceBreakdown, WasteCategory,
    WasteHunter, WasteHunterConfig, WasteOpportunity, WasteSummary,
};

// Savings simulation
pub use savings_simulator::{
    SavingsSimulator, ScenarioType, SimulationScenario, SimulationSummary, TypeBreakdown,
    CONSERVATISM_FACTOR,
};

// AI spend
pub use ai_spend::{AiCategory, AiClassification, AiSpendClassifier, AiSpendReport};
