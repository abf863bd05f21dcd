//! Pre-trained model collaborators
//!
//! The evaluator treats every model as a black box `predict(vector)`. This
//! module defines those boundaries and the bundle that carries them.
//!
//! # Architecture
//!
//! - `ClusterModel`, `StressModel`, `SavingsModel` traits: one per prediction
//! - `ModelBundle`: schema + normalizer + the three models, loaded once and
//!   shared read-only (`Arc`) by every evaluation
//! - Artifact-backed implementations: `KMeansModel`, `LogisticModel`,
//!   `LinearRegressor`
//! - `mock`: fixed and failing stubs for tests and demos
//!
//! # Artifacts
//!
//! Models are persisted as JSON documents tagged by `kind`:
//!
//! ```json
//! {"kind": "kmeans", "features": ["income", "expenses"], "centroids": [[0.1, 0.2]]}
//! ```
//!
//! Each artifact lists the features it was fitted on. `ModelBundle::load`
//! rejects any artifact whose list differs from the active schema.

mod artifact;
mod kmeans;
mod linear;
pub mod mock;

pub use artifact::Artifact;
pub use kmeans::KMeansModel;
pub use linear::{LinearRegressor, LogisticModel};
pub use mock::{FailingModel, FixedCluster, FixedSavings, FixedStress};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::features::{FeatureSchema, FeatureVector, Normalizer};

/// Persona cluster assignment
pub trait ClusterModel: Send + Sync {
    fn name(&self) -> &str;

    /// Expected vector length, `None` if the model accepts any length
    fn input_dim(&self) -> Option<usize>;

    fn predict_cluster(&self, features: &FeatureVector) -> Result<usize>;
}

/// Financial stress classifier. `true` means stressed.
pub trait StressModel: Send + Sync {
    fn name(&self) -> &str;

    fn input_dim(&self) -> Option<usize>;

    fn predict_stressed(&self, features: &FeatureVector) -> Result<bool>;
}

/// Next-month savings regressor
pub trait SavingsModel: Send + Sync {
    fn name(&self) -> &str;

    fn input_dim(&self) -> Option<usize>;

    fn predict_savings(&self, features: &FeatureVector) -> Result<f64>;
}

/// File names of the artifacts inside a models directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub dir: PathBuf,
    pub cluster: String,
    pub stress: String,
    pub savings: String,
    /// Optional fitted scaler; identity when absent
    pub scaler: Option<String>,
}

impl Default for ModelFiles {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("models"),
            cluster: "kmeans.json".to_string(),
            stress: "stress_classifier.json".to_string(),
            savings: "savings_regressor.json".to_string(),
            scaler: Some("scaler.json".to_string()),
        }
    }
}

impl ModelFiles {
    /// Same file names under a different directory
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }
}

/// Summary of a loaded bundle, for `wealthy models` and the API
#[derive(Debug, Clone, Serialize)]
pub struct BundleInfo {
    pub schema_version: String,
    pub features: Vec<&'static str>,
    pub normalizer: &'static str,
    pub cluster_model: String,
    pub stress_model: String,
    pub savings_model: String,
    pub fingerprint: String,
}

/// Immutable set of models shared by every evaluation
#[derive(Clone)]
pub struct ModelBundle {
    schema: FeatureSchema,
    normalizer: Normalizer,
    cluster: Arc<dyn ClusterModel>,
    stress: Arc<dyn StressModel>,
    savings: Arc<dyn SavingsModel>,
    fingerprint: String,
}

impl std::fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBundle")
            .field("schema", &self.schema.version)
            .field("normalizer", &self.normalizer.name())
            .field("cluster", &self.cluster.name())
            .field("stress", &self.stress.name())
            .field("savings", &self.savings.name())
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}

impl ModelBundle {
    /// Assemble a bundle from already-constructed models.
    ///
    /// Every model and the normalizer must agree with the schema length.
    pub fn new(
        schema: FeatureSchema,
        normalizer: Normalizer,
        cluster: Arc<dyn ClusterModel>,
        stress: Arc<dyn StressModel>,
        savings: Arc<dyn SavingsModel>,
    ) -> Result<Self> {
        let expected = schema.len();
        let dims = [
            ("scaler", normalizer.dimension()),
            (cluster.name(), cluster.input_dim()),
            (stress.name(), stress.input_dim()),
            (savings.name(), savings.input_dim()),
        ];
        for (model, dim) in dims {
            if let Some(dim) = dim {
                if dim != expected {
                    return Err(Error::SchemaMismatch {
                        model: model.to_string(),
                        expected: format!("{} features ({})", expected, schema.version),
                        found: format!("{} features", dim),
                    });
                }
            }
        }

        Ok(Self {
            schema,
            normalizer,
            cluster,
            stress,
            savings,
            fingerprint: "in-memory".to_string(),
        })
    }

    /// Load all artifacts from disk and check them against `schema`
    pub fn load(files: &ModelFiles, schema: FeatureSchema) -> Result<Self> {
        let mut hasher = Sha256::new();
        hasher.update(schema.version.as_bytes());

        let cluster_artifact = read_artifact(&files.dir, &files.cluster, &mut hasher)?;
        let stress_artifact = read_artifact(&files.dir, &files.stress, &mut hasher)?;
        let savings_artifact = read_artifact(&files.dir, &files.savings, &mut hasher)?;
        let scaler_artifact = match &files.scaler {
            Some(name) => Some(read_artifact(&files.dir, name, &mut hasher)?),
            None => None,
        };

        for (file, artifact) in [
            (&files.cluster, &cluster_artifact),
            (&files.stress, &stress_artifact),
            (&files.savings, &savings_artifact),
        ] {
            schema.check(file, artifact.features())?;
        }
        if let (Some(file), Some(artifact)) = (&files.scaler, &scaler_artifact) {
            schema.check(file, artifact.features())?;
        }

        let cluster: Arc<dyn ClusterModel> =
            Arc::new(cluster_artifact.into_kmeans(&files.cluster)?);
        let stress: Arc<dyn StressModel> = Arc::new(stress_artifact.into_logistic(&files.stress)?);
        let savings: Arc<dyn SavingsModel> =
            Arc::new(savings_artifact.into_linear(&files.savings)?);
        let normalizer = match (scaler_artifact, &files.scaler) {
            (Some(artifact), Some(name)) => artifact.into_normalizer(name)?,
            _ => Normalizer::Identity,
        };

        let mut bundle = Self::new(schema, normalizer, cluster, stress, savings)?;
        bundle.fingerprint = hex::encode(hasher.finalize());

        tracing::info!(
            dir = %files.dir.display(),
            schema = bundle.schema.version.as_str(),
            normalizer = bundle.normalizer.name(),
            fingerprint = bundle.short_fingerprint(),
            "Model bundle loaded"
        );

        Ok(bundle)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn cluster(&self) -> &dyn ClusterModel {
        self.cluster.as_ref()
    }

    pub fn stress(&self) -> &dyn StressModel {
        self.stress.as_ref()
    }

    pub fn savings(&self) -> &dyn SavingsModel {
        self.savings.as_ref()
    }

    /// SHA-256 over the schema version and every artifact file
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn short_fingerprint(&self) -> &str {
        let end = self.fingerprint.len().min(12);
        &self.fingerprint[..end]
    }

    pub fn info(&self) -> BundleInfo {
        BundleInfo {
            schema_version: self.schema.version.clone(),
            features: self.schema.names(),
            normalizer: self.normalizer.name(),
            cluster_model: self.cluster.name().to_string(),
            stress_model: self.stress.name().to_string(),
            savings_model: self.savings.name().to_string(),
            fingerprint: self.fingerprint.clone(),
        }
    }
}

fn read_artifact(dir: &Path, name: &str, hasher: &mut Sha256) -> Result<Artifact> {
    let path = dir.join(name);
    let bytes = fs::read(&path).map_err(|e| {
        Error::model_unavailable(name, format!("cannot read {}: {}", path.display(), e))
    })?;
    hasher.update(name.as_bytes());
    hasher.update(&bytes);

    serde_json::from_slice(&bytes)
        .map_err(|e| Error::model_unavailable(name, format!("malformed artifact: {}", e)))
}

/// Dot product with a dimension check shared by the linear models
pub(crate) fn checked_dot(
    model: &str,
    weights: &[f64],
    features: &FeatureVector,
) -> Result<f64> {
    if weights.len() != features.len() {
        return Err(Error::model_unavailable(
            model,
            format!(
                "expected {} features, got {}",
                weights.len(),
                features.len()
            ),
        ));
    }
    Ok(weights
        .iter()
        .zip(features.as_slice())
        .map(|(w, x)| w * x)
        .sum())
}
