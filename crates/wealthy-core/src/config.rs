//! Application configuration
//!
//! Scoring thresholds, the feature schema, the persona table, model artifact
//! locations and presentation settings, read from a single TOML file.
//!
//! ## Configuration Resolution
//!
//! 1. An explicit path (`--config`) wins; it must exist
//! 2. Otherwise the override in the data dir (~/.local/share/wealthy/config/wealthy.toml)
//! 3. Otherwise the embedded defaults (compiled into binary)
//!
//! Every key is optional. Missing keys keep their built-in default.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::evaluator::{PersonaTable, SavingsRounding};
use crate::features::FeatureSchema;
use crate::predictors::ModelFiles;
use crate::scoring::{ScoringPolicy, ScoringVariant};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/wealthy.toml");

/// Report and display settings
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationConfig {
    pub rounding: SavingsRounding,
    pub currency_symbol: String,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            rounding: SavingsRounding::Truncate,
            currency_symbol: "₹".to_string(),
        }
    }
}

/// Fully resolved configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub scoring: ScoringPolicy,
    pub schema: FeatureSchema,
    pub personas: PersonaTable,
    pub models: ModelFiles,
    pub presentation: PresentationConfig,
    /// File the config was read from, `None` for embedded defaults
    pub source: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringPolicy::default(),
            schema: FeatureSchema::full6_v1(),
            personas: PersonaTable::default(),
            models: ModelFiles::default(),
            presentation: PresentationConfig::default(),
            source: None,
        }
    }
}

impl AppConfig {
    /// Load with the standard resolution order
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let (content, source) = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                (read_config(path)?, Some(path.to_path_buf()))
            }
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => (read_config(&path)?, Some(path)),
                None => (DEFAULT_CONFIG.to_string(), None),
            },
        };

        let mut config = parse_config(&content)?;
        config.source = source;

        tracing::debug!(
            source = config
                .source
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "embedded".to_string()),
            schema = config.schema.version.as_str(),
            variant = config.scoring.variant.as_str(),
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Embedded defaults only
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("wealthy").join("config").join("wealthy.toml"))
}

fn read_config(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config {}: {}", path.display(), e))
    })
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    scoring: Option<RawScoring>,
    features: Option<RawFeatures>,
    personas: Option<BTreeMap<String, String>>,
    models: Option<RawModels>,
    presentation: Option<RawPresentation>,
}

#[derive(Debug, Deserialize)]
struct RawScoring {
    variant: Option<String>,
    savings_rate_min: Option<f64>,
    expense_ratio_max: Option<f64>,
    debt_ratio_max: Option<f64>,
    emergency_months_min: Option<u8>,
    points_per_check: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawFeatures {
    schema: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawModels {
    dir: Option<PathBuf>,
    cluster: Option<String>,
    stress: Option<String>,
    savings: Option<String>,
    scaler: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPresentation {
    rounding: Option<String>,
    currency_symbol: Option<String>,
}

/// Parse config from TOML content
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = AppConfig::default();

    if let Some(scoring) = raw.scoring {
        if let Some(variant) = scoring.variant {
            config.scoring.variant = variant
                .parse::<ScoringVariant>()
                .map_err(|e| Error::Config(format!("scoring.variant: {}", e)))?;
        }
        if let Some(v) = scoring.savings_rate_min {
            config.scoring.savings_rate_min = v;
        }
        if let Some(v) = scoring.expense_ratio_max {
            config.scoring.expense_ratio_max = v;
        }
        if let Some(v) = scoring.debt_ratio_max {
            config.scoring.debt_ratio_max = v;
        }
        if let Some(v) = scoring.emergency_months_min {
            config.scoring.emergency_months_min = v;
        }
        if let Some(points) = scoring.points_per_check {
            config.scoring.points_per_check = u32::try_from(points).map_err(|_| {
                Error::Config(format!(
                    "scoring.points_per_check must be a non-negative integer (got {})",
                    points
                ))
            })?;
        }
    }
    config.scoring.validate()?;

    if let Some(schema) = raw.features.and_then(|f| f.schema) {
        config.schema = FeatureSchema::by_version(&schema)?;
    }

    if let Some(personas) = raw.personas {
        let mut labels = Vec::with_capacity(personas.len());
        for (key, label) in &personas {
            let cluster = key.parse::<usize>().map_err(|_| {
                Error::Config(format!("personas: cluster id must be an integer (got {})", key))
            })?;
            labels.push((cluster, label.as_str()));
        }
        config.personas = PersonaTable::from_labels(labels)?;
    }

    if let Some(models) = raw.models {
        if let Some(dir) = models.dir {
            config.models.dir = dir;
        }
        if let Some(name) = models.cluster {
            config.models.cluster = name;
        }
        if let Some(name) = models.stress {
            config.models.stress = name;
        }
        if let Some(name) = models.savings {
            config.models.savings = name;
        }
        // empty string disables the scaler
        if let Some(name) = models.scaler {
            config.models.scaler = if name.trim().is_empty() {
                None
            } else {
                Some(name)
            };
        }
    }

    if let Some(presentation) = raw.presentation {
        if let Some(rounding) = presentation.rounding {
            config.presentation.rounding = rounding
                .parse::<SavingsRounding>()
                .map_err(|e| Error::Config(format!("presentation.rounding: {}", e)))?;
        }
        if let Some(symbol) = presentation.currency_symbol {
            config.presentation.currency_symbol = symbol;
        }
    }

    Ok(config)
}
