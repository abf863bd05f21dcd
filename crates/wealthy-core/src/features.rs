//! Feature schema, feature vectors and normalization
//!
//! The trained models consume a positional vector. The position of each field
//! is part of the contract with the model, so it is spelled out here as a
//! named, versioned schema. Every artifact declares the feature names it was
//! fitted on and the bundle loader compares them with the active schema.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::UserFinancialRecord;

/// A single model input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureName {
    Income,
    Expenses,
    Savings,
    Debt,
    EmergencyFundMonths,
    BudgetsMonthly,
}

impl FeatureName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureName::Income => "income",
            FeatureName::Expenses => "expenses",
            FeatureName::Savings => "savings",
            FeatureName::Debt => "debt",
            FeatureName::EmergencyFundMonths => "emergency_fund_months",
            FeatureName::BudgetsMonthly => "budgets_monthly",
        }
    }

    /// Read this feature off a record
    pub fn extract(&self, record: &UserFinancialRecord) -> f64 {
        match self {
            FeatureName::Income => record.income,
            FeatureName::Expenses => record.expenses,
            FeatureName::Savings => record.savings,
            FeatureName::Debt => record.debt,
            FeatureName::EmergencyFundMonths => f64::from(record.emergency_fund_months),
            FeatureName::BudgetsMonthly => {
                if record.budgets_monthly {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FeatureName {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "income" => Ok(FeatureName::Income),
            "expenses" => Ok(FeatureName::Expenses),
            "savings" => Ok(FeatureName::Savings),
            "debt" => Ok(FeatureName::Debt),
            "emergency_fund_months" | "emergency_fund" => Ok(FeatureName::EmergencyFundMonths),
            "budgets_monthly" | "budgeting" => Ok(FeatureName::BudgetsMonthly),
            _ => Err(format!("Unknown feature: {}", s)),
        }
    }
}

/// Ordered list of features the models were fitted on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSchema {
    pub version: String,
    pub features: Vec<FeatureName>,
}

impl FeatureSchema {
    /// income, expenses, savings, debt
    pub fn core4_v1() -> Self {
        Self {
            version: "core4-v1".to_string(),
            features: vec![
                FeatureName::Income,
                FeatureName::Expenses,
                FeatureName::Savings,
                FeatureName::Debt,
            ],
        }
    }

    /// core4 plus emergency fund months and the budgeting flag
    pub fn full6_v1() -> Self {
        Self {
            version: "full6-v1".to_string(),
            features: vec![
                FeatureName::Income,
                FeatureName::Expenses,
                FeatureName::Savings,
                FeatureName::Debt,
                FeatureName::EmergencyFundMonths,
                FeatureName::BudgetsMonthly,
            ],
        }
    }

    /// Look up a built-in schema by version string
    pub fn by_version(version: &str) -> Result<Self> {
        match version {
            "core4-v1" => Ok(Self::core4_v1()),
            "full6-v1" => Ok(Self::full6_v1()),
            other => Err(Error::Config(format!("Unknown feature schema: {}", other))),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.features.iter().map(|f| f.as_str()).collect()
    }

    /// Compare the feature names an artifact declares against this schema
    pub fn check(&self, model: &str, declared: &[String]) -> Result<()> {
        let expected = self.names();
        let matches = declared.len() == expected.len()
            && declared
                .iter()
                .zip(expected.iter())
                .all(|(d, e)| d.parse::<FeatureName>().map(|f| f.as_str()) == Ok(*e));

        if matches {
            Ok(())
        } else {
            Err(Error::SchemaMismatch {
                model: model.to_string(),
                expected: expected.join(", "),
                found: declared.join(", "),
            })
        }
    }

    /// Project a record onto this schema
    pub fn vectorize(&self, record: &UserFinancialRecord) -> FeatureVector {
        FeatureVector {
            values: self.features.iter().map(|f| f.extract(record)).collect(),
        }
    }
}

/// Fixed-order numeric projection of a record
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self { values }
    }
}

/// Transform applied to every vector before it reaches the models.
///
/// Parameters come from training; nothing is refit per request.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalizer {
    Identity,
    Standard { mean: Vec<f64>, scale: Vec<f64> },
}

impl Normalizer {
    /// Standard scaler. Zero or non-finite scales are replaced by 1.
    pub fn standard(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        if mean.len() != scale.len() {
            return Err(Error::model_unavailable(
                "scaler",
                format!(
                    "mean has {} entries but scale has {}",
                    mean.len(),
                    scale.len()
                ),
            ));
        }
        if mean.iter().any(|m| !m.is_finite()) {
            return Err(Error::model_unavailable("scaler", "mean contains non-finite values"));
        }
        let scale = scale
            .into_iter()
            .map(|s| if s.is_finite() && s != 0.0 { s } else { 1.0 })
            .collect();
        Ok(Normalizer::Standard { mean, scale })
    }

    /// Number of features this transform expects, if fixed
    pub fn dimension(&self) -> Option<usize> {
        match self {
            Normalizer::Identity => None,
            Normalizer::Standard { mean, .. } => Some(mean.len()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Normalizer::Identity => "identity",
            Normalizer::Standard { .. } => "standard",
        }
    }

    pub fn apply(&self, vector: &FeatureVector) -> Result<FeatureVector> {
        match self {
            Normalizer::Identity => Ok(vector.clone()),
            Normalizer::Standard { mean, scale } => {
                if vector.len() != mean.len() {
                    return Err(Error::model_unavailable(
                        "scaler",
                        format!(
                            "expected {} features, got {}",
                            mean.len(),
                            vector.len()
                        ),
                    ));
                }
                let values = vector
                    .as_slice()
                    .iter()
                    .zip(mean.iter().zip(scale.iter()))
                    .map(|(x, (m, s))| (x - m) / s)
                    .collect();
                Ok(FeatureVector { values })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> UserFinancialRecord {
        UserFinancialRecord::new(50000.0, 20000.0, 15000.0, 5000.0, 4, true).unwrap()
    }

    #[test]
    fn test_core4_order() {
        let v = FeatureSchema::core4_v1().vectorize(&record());
        assert_eq!(v.as_slice(), &[50000.0, 20000.0, 15000.0, 5000.0]);
    }

    #[test]
    fn test_full6_order_and_bool_encoding() {
        let v = FeatureSchema::full6_v1().vectorize(&record());
        assert_eq!(v.as_slice(), &[50000.0, 20000.0, 15000.0, 5000.0, 4.0, 1.0]);

        let mut no_budget = record();
        no_budget.budgets_monthly = false;
        let v = FeatureSchema::full6_v1().vectorize(&no_budget);
        assert_eq!(v.as_slice()[5], 0.0);
    }

    #[test]
    fn test_by_version() {
        assert_eq!(FeatureSchema::by_version("full6-v1").unwrap().len(), 6);
        assert!(matches!(
            FeatureSchema::by_version("v9"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_check_accepts_aliases_in_order() {
        let schema = FeatureSchema::full6_v1();
        let declared: Vec<String> = [
            "income",
            "expenses",
            "savings",
            "debt",
            "emergency_fund",
            "budgeting",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert!(schema.check("kmeans", &declared).is_ok());
    }

    #[test]
    fn test_check_rejects_reordered() {
        let schema = FeatureSchema::core4_v1();
        let declared: Vec<String> = ["income", "savings", "expenses", "debt"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let err = schema.check("savings_regressor", &declared).unwrap_err();
        match err {
            Error::SchemaMismatch { model, found, .. } => {
                assert_eq!(model, "savings_regressor");
                assert_eq!(found, "income, savings, expenses, debt");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_check_rejects_wrong_length() {
        let schema = FeatureSchema::full6_v1();
        let declared: Vec<String> = FeatureSchema::core4_v1()
            .names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(schema.check("kmeans", &declared).is_err());
    }

    #[test]
    fn test_standard_scaler() {
        let scaler = Normalizer::standard(vec![10.0, 0.0], vec![2.0, 0.0]).unwrap();
        let out = scaler.apply(&FeatureVector::from(vec![14.0, 3.0])).unwrap();
        // zero scale replaced by 1
        assert_eq!(out.as_slice(), &[2.0, 3.0]);
    }

    #[test]
    fn test_standard_scaler_dimension_mismatch() {
        let scaler = Normalizer::standard(vec![0.0; 4], vec![1.0; 4]).unwrap();
        let err = scaler
            .apply(&FeatureVector::from(vec![1.0, 2.0]))
            .unwrap_err();
        assert!(matches!(err, Error::ModelUnavailable { ref model, .. } if model == "scaler"));
    }

    #[test]
    fn test_standard_scaler_rejects_uneven_params() {
        assert!(Normalizer::standard(vec![0.0; 3], vec![1.0; 2]).is_err());
    }

    #[test]
    fn test_identity_is_noop() {
        let v = FeatureVector::from(vec![1.0, 2.0, 3.0]);
        assert_eq!(Normalizer::Identity.apply(&v).unwrap(), v);
        assert_eq!(Normalizer::Identity.dimension(), None);
    }
}
