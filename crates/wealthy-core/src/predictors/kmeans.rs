//! Nearest-centroid cluster assignment

use crate::error::{Error, Result};
use crate::features::FeatureVector;

use super::ClusterModel;

/// K-means model reduced to its fitted centroids
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansModel {
    name: String,
    centroids: Vec<Vec<f64>>,
    dim: usize,
}

impl KMeansModel {
    pub fn new(name: &str, centroids: Vec<Vec<f64>>) -> Result<Self> {
        let dim = match centroids.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => {
                return Err(Error::model_unavailable(
                    name,
                    "kmeans artifact has no centroids",
                ))
            }
        };

        for (idx, centroid) in centroids.iter().enumerate() {
            if centroid.len() != dim {
                return Err(Error::model_unavailable(
                    name,
                    format!(
                        "centroid {} has {} values, expected {}",
                        idx,
                        centroid.len(),
                        dim
                    ),
                ));
            }
            if centroid.iter().any(|v| !v.is_finite()) {
                return Err(Error::model_unavailable(
                    name,
                    format!("centroid {} contains non-finite values", idx),
                ));
            }
        }

        Ok(Self {
            name: name.to_string(),
            centroids,
            dim,
        })
    }

    pub fn n_clusters(&self) -> usize {
        self.centroids.len()
    }
}

impl ClusterModel for KMeansModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_dim(&self) -> Option<usize> {
        Some(self.dim)
    }

    /// Index of the closest centroid (squared Euclidean). Ties go to the lower index.
    fn predict_cluster(&self, features: &FeatureVector) -> Result<usize> {
        if features.len() != self.dim {
            return Err(Error::model_unavailable(
                &self.name,
                format!("expected {} features, got {}", self.dim, features.len()),
            ));
        }

        let mut best: Option<(usize, f64)> = None;
        for (idx, centroid) in self.centroids.iter().enumerate() {
            let distance: f64 = centroid
                .iter()
                .zip(features.as_slice())
                .map(|(c, x)| (c - x) * (c - x))
                .sum();
            if !distance.is_finite() {
                return Err(Error::model_unavailable(
                    &self.name,
                    "distance is not finite",
                ));
            }
            match best {
                Some((_, d)) if d <= distance => {}
                _ => best = Some((idx, distance)),
            }
        }

        best.map(|(idx, _)| idx)
            .ok_or_else(|| Error::model_unavailable(&self.name, "no centroids"))
    }
}
