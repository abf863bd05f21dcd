//! Error types for Wealthy Ways

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model unavailable ({model}): {reason}")]
    ModelUnavailable { model: String, reason: String },

    #[error("Feature schema mismatch for {model}: expected [{expected}], found [{found}]")]
    SchemaMismatch {
        model: String,
        expected: String,
        found: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Shorthand for a model failure attributed to `model`
    pub fn model_unavailable(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            model: model.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
