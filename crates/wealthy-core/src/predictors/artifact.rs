//! On-disk model artifact formats

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::features::Normalizer;

use super::kmeans::KMeansModel;
use super::linear::{LinearRegressor, LogisticModel};

fn default_threshold() -> f64 {
    0.5
}

/// A persisted model, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Artifact {
    Kmeans {
        features: Vec<String>,
        centroids: Vec<Vec<f64>>,
    },
    Logistic {
        features: Vec<String>,
        weights: Vec<f64>,
        intercept: f64,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
    Linear {
        features: Vec<String>,
        coefficients: Vec<f64>,
        intercept: f64,
    },
    StandardScaler {
        features: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
}

impl Artifact {
    pub fn kind(&self) -> &'static str {
        match self {
            Artifact::Kmeans { .. } => "kmeans",
            Artifact::Logistic { .. } => "logistic",
            Artifact::Linear { .. } => "linear",
            Artifact::StandardScaler { .. } => "standard_scaler",
        }
    }

    /// Feature names the artifact was fitted on, in order
    pub fn features(&self) -> &[String] {
        match self {
            Artifact::Kmeans { features, .. }
            | Artifact::Logistic { features, .. }
            | Artifact::Linear { features, .. }
            | Artifact::StandardScaler { features, .. } => features,
        }
    }

    pub fn into_kmeans(self, name: &str) -> Result<KMeansModel> {
        match self {
            Artifact::Kmeans { centroids, .. } => KMeansModel::new(name, centroids),
            other => Err(wrong_kind(name, "kmeans", other.kind())),
        }
    }

    pub fn into_logistic(self, name: &str) -> Result<LogisticModel> {
        match self {
            Artifact::Logistic {
                weights,
                intercept,
                threshold,
                ..
            } => LogisticModel::new(name, weights, intercept, threshold),
            other => Err(wrong_kind(name, "logistic", other.kind())),
        }
    }

    pub fn into_linear(self, name: &str) -> Result<LinearRegressor> {
        match self {
            Artifact::Linear {
                coefficients,
                intercept,
                ..
            } => LinearRegressor::new(name, coefficients, intercept),
            other => Err(wrong_kind(name, "linear", other.kind())),
        }
    }

    pub fn into_normalizer(self, name: &str) -> Result<Normalizer> {
        match self {
            Artifact::StandardScaler { mean, scale, .. } => Normalizer::standard(mean, scale)
                .map_err(|e| match e {
                    Error::ModelUnavailable { reason, .. } => {
                        Error::model_unavailable(name, reason)
                    }
                    other => other,
                }),
            other => Err(wrong_kind(name, "standard_scaler", other.kind())),
        }
    }
}

fn wrong_kind(name: &str, expected: &str, found: &str) -> Error {
    Error::model_unavailable(
        name,
        format!("expected a {} artifact, found {}", expected, found),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logistic_threshold_defaults() {
        let artifact: Artifact = serde_json::from_str(
            r#"{"kind":"logistic","features":["income"],"weights":[1.0],"intercept":0.0}"#,
        )
        .unwrap();
        match artifact {
            Artifact::Logistic { threshold, .. } => assert_eq!(threshold, 0.5),
            other => panic!("unexpected artifact {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let parsed: std::result::Result<Artifact, _> =
            serde_json::from_str(r#"{"kind":"random_forest","features":[]}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_wrong_kind_names_file() {
        let artifact = Artifact::Linear {
            features: vec!["income".to_string()],
            coefficients: vec![1.0],
            intercept: 0.0,
        };
        let err = artifact.into_kmeans("kmeans.json").unwrap_err();
        match err {
            Error::ModelUnavailable { model, reason } => {
                assert_eq!(model, "kmeans.json");
                assert!(reason.contains("found linear"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
