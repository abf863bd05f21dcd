//! Stub models for testing
//!
//! Fixed-output and always-failing models. Useful for unit tests and for
//! exercising the pipeline without trained artifacts.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::features::{FeatureSchema, FeatureVector, Normalizer};

use super::{ClusterModel, ModelBundle, SavingsModel, StressModel};

/// Always returns the same cluster id
#[derive(Debug, Clone, Copy)]
pub struct FixedCluster(pub usize);

/// Always returns the same stress flag
#[derive(Debug, Clone, Copy)]
pub struct FixedStress(pub bool);

/// Always returns the same savings prediction
#[derive(Debug, Clone, Copy)]
pub struct FixedSavings(pub f64);

impl ClusterModel for FixedCluster {
    fn name(&self) -> &str {
        "fixed-cluster"
    }

    fn input_dim(&self) -> Option<usize> {
        None
    }

    fn predict_cluster(&self, _features: &FeatureVector) -> Result<usize> {
        Ok(self.0)
    }
}

impl StressModel for FixedStress {
    fn name(&self) -> &str {
        "fixed-stress"
    }

    fn input_dim(&self) -> Option<usize> {
        None
    }

    fn predict_stressed(&self, _features: &FeatureVector) -> Result<bool> {
        Ok(self.0)
    }
}

impl SavingsModel for FixedSavings {
    fn name(&self) -> &str {
        "fixed-savings"
    }

    fn input_dim(&self) -> Option<usize> {
        None
    }

    fn predict_savings(&self, _features: &FeatureVector) -> Result<f64> {
        Ok(self.0)
    }
}

/// A model that fails every call, for exercising error paths
#[derive(Debug, Clone)]
pub struct FailingModel {
    pub name: String,
    pub reason: String,
}

impl FailingModel {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            reason: "model backend offline".to_string(),
        }
    }

    fn fail<T>(&self) -> Result<T> {
        Err(Error::model_unavailable(&self.name, &self.reason))
    }
}

impl ClusterModel for FailingModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_dim(&self) -> Option<usize> {
        None
    }

    fn predict_cluster(&self, _features: &FeatureVector) -> Result<usize> {
        self.fail()
    }
}

impl StressModel for FailingModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_dim(&self) -> Option<usize> {
        None
    }

    fn predict_stressed(&self, _features: &FeatureVector) -> Result<bool> {
        self.fail()
    }
}

impl SavingsModel for FailingModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_dim(&self) -> Option<usize> {
        None
    }

    fn predict_savings(&self, _features: &FeatureVector) -> Result<f64> {
        self.fail()
    }
}

impl ModelBundle {
    /// Bundle of fixed stubs over the given schema, no normalization
    pub fn fixed(schema: FeatureSchema, cluster: usize, stressed: bool, savings: f64) -> Self {
        Self {
            schema,
            normalizer: Normalizer::Identity,
            cluster: Arc::new(FixedCluster(cluster)),
            stress: Arc::new(FixedStress(stressed)),
            savings: Arc::new(FixedSavings(savings)),
            fingerprint: "in-memory".to_string(),
        }
    }
}
