//! Profile Evaluator - runs the record through the pre-trained models
//!
//! 1. Project the record onto the bundle's feature schema
//! 2. Apply the bundle's fitted normalizer once
//! 3. Query the cluster, stress and savings models with that same vector
//!
//! Any model failure aborts the evaluation. No default persona or stress
//! level is ever substituted.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Persona, StressLevel, UserFinancialRecord};
use crate::predictors::ModelBundle;

/// Cluster id to persona mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaTable {
    entries: BTreeMap<usize, Persona>,
}

impl Default for PersonaTable {
    fn default() -> Self {
        Self::new([
            (0, Persona::StableSaver),
            (1, Persona::OverSpender),
            (2, Persona::AtRisk),
        ])
    }
}

impl PersonaTable {
    pub fn new(entries: impl IntoIterator<Item = (usize, Persona)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Build from configured labels; any unrecognized label is an error
    pub fn from_labels<'a>(
        labels: impl IntoIterator<Item = (usize, &'a str)>,
    ) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for (cluster, label) in labels {
            let persona = label
                .parse::<Persona>()
                .map_err(|e| Error::Config(format!("personas.{}: {}", cluster, e)))?;
            entries.insert(cluster, persona);
        }
        if entries.is_empty() {
            return Err(Error::Config("persona table is empty".to_string()));
        }
        Ok(Self { entries })
    }

    /// Persona for a cluster id; unmapped ids become `Persona::Unknown`
    pub fn resolve(&self, cluster: usize) -> Persona {
        match self.entries.get(&cluster) {
            Some(persona) => *persona,
            None => {
                tracing::warn!(cluster, "Cluster id has no persona mapping");
                Persona::Unknown { cluster }
            }
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&usize, &Persona)> {
        self.entries.iter()
    }
}

/// How the savings prediction is rounded before presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingsRounding {
    None,
    /// Drop the fractional part (toward zero)
    #[default]
    Truncate,
    Nearest,
}

impl SavingsRounding {
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            SavingsRounding::None => value,
            SavingsRounding::Truncate => value.trunc(),
            SavingsRounding::Nearest => value.round(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SavingsRounding::None => "none",
            SavingsRounding::Truncate => "truncate",
            SavingsRounding::Nearest => "nearest",
        }
    }
}

impl fmt::Display for SavingsRounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SavingsRounding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "none" => Ok(SavingsRounding::None),
            "truncate" => Ok(SavingsRounding::Truncate),
            "nearest" => Ok(SavingsRounding::Nearest),
            _ => Err(format!("Unknown rounding policy: {}", s)),
        }
    }
}

/// Model-derived view of a record
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Profile {
    pub cluster: usize,
    pub persona: Persona,
    pub stress_level: StressLevel,
    pub predicted_next_month_savings: f64,
}

/// Turns a record into a `Profile` using a model bundle
#[derive(Debug, Clone, Default)]
pub struct ProfileEvaluator {
    personas: PersonaTable,
    rounding: SavingsRounding,
}

impl ProfileEvaluator {
    pub fn new(personas: PersonaTable, rounding: SavingsRounding) -> Self {
        Self { personas, rounding }
    }

    pub fn personas(&self) -> &PersonaTable {
        &self.personas
    }

    pub fn evaluate(&self, record: &UserFinancialRecord, models: &ModelBundle) -> Result<Profile> {
        let raw = models.schema().vectorize(record);
        let features = models.normalizer().apply(&raw)?;

        tracing::debug!(
            schema = models.schema().version.as_str(),
            normalizer = models.normalizer().name(),
            features = ?features.as_slice(),
            "Feature vector assembled"
        );

        let cluster = models.cluster().predict_cluster(&features)?;
        let persona = self.personas.resolve(cluster);

        let stress_level = StressLevel::from_flag(models.stress().predict_stressed(&features)?);

        let predicted = models.savings().predict_savings(&features)?;
        if !predicted.is_finite() {
            return Err(Error::model_unavailable(
                models.savings().name(),
                "prediction is not finite",
            ));
        }
        let predicted_next_month_savings = self.rounding.apply(predicted);

        tracing::debug!(
            cluster,
            persona = persona.as_str(),
            stress = stress_level.as_str(),
            predicted = predicted_next_month_savings,
            "Profile evaluated"
        );

        Ok(Profile {
            cluster,
            persona,
            stress_level,
            predicted_next_month_savings,
        })
    }
}

/// Evaluate with the default persona table and rounding
pub fn evaluate(record: &UserFinancialRecord, models: &ModelBundle) -> Result<Profile> {
    ProfileEvaluator::default().evaluate(record, models)
}
