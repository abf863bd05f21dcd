//! Linear and logistic models

use crate::error::{Error, Result};
use crate::features::FeatureVector;

use super::{checked_dot, SavingsModel, StressModel};

fn validate_params(name: &str, weights: &[f64], intercept: f64) -> Result<()> {
    if weights.is_empty() {
        return Err(Error::model_unavailable(name, "artifact has no weights"));
    }
    if weights.iter().any(|w| !w.is_finite()) || !intercept.is_finite() {
        return Err(Error::model_unavailable(
            name,
            "artifact contains non-finite parameters",
        ));
    }
    Ok(())
}

/// Binary classifier: `sigmoid(w·x + b) >= threshold` means stressed
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticModel {
    name: String,
    weights: Vec<f64>,
    intercept: f64,
    threshold: f64,
}

impl LogisticModel {
    pub fn new(name: &str, weights: Vec<f64>, intercept: f64, threshold: f64) -> Result<Self> {
        validate_params(name, &weights, intercept)?;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::model_unavailable(
                name,
                format!("threshold must be within [0, 1] (got {})", threshold),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            weights,
            intercept,
            threshold,
        })
    }

    /// Probability of the positive (stressed) class
    pub fn probability(&self, features: &FeatureVector) -> Result<f64> {
        let z = checked_dot(&self.name, &self.weights, features)? + self.intercept;
        if z.is_nan() {
            return Err(Error::model_unavailable(&self.name, "logit is NaN"));
        }
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

impl StressModel for LogisticModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_dim(&self) -> Option<usize> {
        Some(self.weights.len())
    }

    fn predict_stressed(&self, features: &FeatureVector) -> Result<bool> {
        Ok(self.probability(features)? >= self.threshold)
    }
}

/// Ordinary linear regression: `w·x + b`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegressor {
    name: String,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearRegressor {
    pub fn new(name: &str, coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        validate_params(name, &coefficients, intercept)?;
        Ok(Self {
            name: name.to_string(),
            coefficients,
            intercept,
        })
    }
}

impl SavingsModel for LinearRegressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_dim(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn predict_savings(&self, features: &FeatureVector) -> Result<f64> {
        let value = checked_dot(&self.name, &self.coefficients, features)? + self.intercept;
        if !value.is_finite() {
            return Err(Error::model_unavailable(
                &self.name,
                "prediction is not finite",
            ));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logistic_decision() {
        let model = LogisticModel::new("stress", vec![1.0, -1.0], 0.0, 0.5).unwrap();
        assert!(model.predict_stressed(&vec![2.0, 1.0].into()).unwrap());
        assert!(!model.predict_stressed(&vec![1.0, 2.0].into()).unwrap());
        // exactly on the boundary counts as stressed
        assert!(model.predict_stressed(&vec![1.0, 1.0].into()).unwrap());
    }

    #[test]
    fn test_logistic_probability_range() {
        let model = LogisticModel::new("stress", vec![100.0], 0.0, 0.5).unwrap();
        let high = model.probability(&vec![10.0].into()).unwrap();
        let low = model.probability(&vec![-10.0].into()).unwrap();
        assert!(high <= 1.0 && high > 0.99);
        assert!(low >= 0.0 && low < 0.01);
    }

    #[test]
    fn test_logistic_rejects_bad_threshold() {
        assert!(LogisticModel::new("stress", vec![1.0], 0.0, 1.5).is_err());
        assert!(LogisticModel::new("stress", vec![], 0.0, 0.5).is_err());
    }

    #[test]
    fn test_linear_prediction() {
        let model = LinearRegressor::new("savings", vec![0.5, 0.25], 10.0).unwrap();
        let value = model.predict_savings(&vec![100.0, 40.0].into()).unwrap();
        assert_eq!(value, 70.0);
    }

    #[test]
    fn test_linear_dimension_mismatch() {
        let model = LinearRegressor::new("savings", vec![0.5, 0.25], 10.0).unwrap();
        let err = model.predict_savings(&vec![1.0].into()).unwrap_err();
        assert!(matches!(err, Error::ModelUnavailable { ref model, .. } if model == "savings"));
    }

    #[test]
    fn test_linear_overflow_is_error() {
        let model = LinearRegressor::new("savings", vec![f64::MAX], 0.0).unwrap();
        assert!(model.predict_savings(&vec![10.0].into()).is_err());
    }

    #[test]
    fn test_linear_rejects_nan_params() {
        assert!(LinearRegressor::new("savings", vec![f64::NAN], 0.0).is_err());
        assert!(LinearRegressor::new("savings", vec![1.0], f64::INFINITY).is_err());
    }
}
