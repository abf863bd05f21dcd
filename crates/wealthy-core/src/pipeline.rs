//! Evaluation pipeline
//!
//! record -> Scorer -> Profile Evaluator -> Advisor -> `EvaluationResult`
//!
//! Strictly forward and synchronous. A failure at any stage is returned as a
//! typed error and no partial result is produced.

use std::sync::Arc;

use crate::advisor::advise;
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::evaluator::ProfileEvaluator;
use crate::models::{ChartData, DerivedMetrics, EvaluationResult, UserFinancialRecord};
use crate::predictors::ModelBundle;
use crate::scoring::Scorer;

/// Wires the scorer, evaluator and advisor over a shared model bundle
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: AppConfig,
    scorer: Scorer,
    evaluator: ProfileEvaluator,
    bundle: Arc<ModelBundle>,
}

impl Pipeline {
    /// The bundle must have been loaded with the configured schema
    pub fn new(config: AppConfig, bundle: Arc<ModelBundle>) -> Result<Self> {
        if bundle.schema() != &config.schema {
            return Err(Error::SchemaMismatch {
                model: "bundle".to_string(),
                expected: config.schema.version.clone(),
                found: bundle.schema().version.clone(),
            });
        }

        Ok(Self {
            scorer: Scorer::new(config.scoring.clone()),
            evaluator: ProfileEvaluator::new(config.personas.clone(), config.presentation.rounding),
            bundle,
            config,
        })
    }

    /// Load the bundle named by the config and build the pipeline
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let bundle = ModelBundle::load(&config.models, config.schema.clone())?;
        Self::new(config, Arc::new(bundle))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    /// Run one submission through every stage
    pub fn evaluate(&self, record: &UserFinancialRecord) -> Result<EvaluationResult> {
        let span = tracing::debug_span!("evaluate", model = self.bundle.short_fingerprint());
        let _enter = span.enter();

        record.validate()?;

        let score = self.scorer.score(record);
        let profile = self.evaluator.evaluate(record, &self.bundle)?;
        let tips = advise(
            profile.persona,
            profile.stress_level,
            profile.predicted_next_month_savings,
            record.savings,
        );

        tracing::info!(
            score = score.value,
            max = score.max,
            persona = profile.persona.as_str(),
            stress = profile.stress_level.as_str(),
            tips = tips.len(),
            "Evaluation complete"
        );

        Ok(EvaluationResult {
            score: score.value,
            max_score: score.max,
            breakdown: score.checks,
            cluster: profile.cluster,
            persona: profile.persona,
            stress_level: profile.stress_level,
            predicted_next_month_savings: profile.predicted_next_month_savings,
            tips,
            metrics: DerivedMetrics::from_record(record),
            chart: ChartData::from_record(record),
            model_fingerprint: self.bundle.fingerprint().to_string(),
        })
    }
}
