//! Wealthy Ways Core Library
//!
//! Shared functionality for the Wealthy Ways financial wellbeing profiler:
//! - Rule-based wellness scoring (percent and tiered variants)
//! - Versioned feature schemas and fitted normalization
//! - Pre-trained persona, stress and savings models loaded from artifacts
//! - Profile evaluator and ordered advice
//! - Evaluation pipeline tying the stages together
//! - Report rendering (text, JSON, CSV)
//! - TOML configuration with embedded defaults

pub mod advisor;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod features;
pub mod models;
pub mod pipeline;
pub mod predictors;
pub mod report;
pub mod scoring;

pub use advisor::advise;
pub use config::{AppConfig, PresentationConfig};
pub use error::{Error, Result};
pub use evaluator::{PersonaTable, Profile, ProfileEvaluator, SavingsRounding};
pub use features::{FeatureName, FeatureSchema, FeatureVector, Normalizer};
pub use models::{
    ChartData, DerivedMetrics, EvaluationResult, Persona, StressLevel, UserFinancialRecord,
};
pub use pipeline::Pipeline;
pub use predictors::{
    BundleInfo, ClusterModel, ModelBundle, ModelFiles, SavingsModel, StressModel,
};
pub use report::{ReportDocument, ReportEntry, ReportFormat};
pub use scoring::{CheckKind, Score, ScoreCheck, Scorer, ScoringPolicy, ScoringVariant};
