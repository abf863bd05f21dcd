//! Domain models for Wealthy Ways

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::scoring::ScoreCheck;

/// Upper bound for the emergency fund slider (months)
pub const MAX_EMERGENCY_FUND_MONTHS: u8 = 12;

/// Accepted age range on the input form
pub const MIN_AGE: u8 = 10;
pub const MAX_AGE: u8 = 100;

/// One user submission. All money fields share a currency unit.
///
/// Nothing ties the fields to each other: expenses may exceed income, and
/// the scorer treats that as a signal rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFinancialRecord {
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    pub debt: f64,
    pub emergency_fund_months: u8,
    pub budgets_monthly: bool,
    /// Display name for the report header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Age in years, only shown on the report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
}

impl UserFinancialRecord {
    /// Build and validate a record
    pub fn new(
        income: f64,
        expenses: f64,
        savings: f64,
        debt: f64,
        emergency_fund_months: u8,
        budgets_monthly: bool,
    ) -> Result<Self> {
        let record = Self {
            income,
            expenses,
            savings,
            debt,
            emergency_fund_months,
            budgets_monthly,
            name: None,
            age: None,
        };
        record.validate()?;
        Ok(record)
    }

    /// Attach a display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = if name.trim().is_empty() {
            None
        } else {
            Some(name.trim().to_string())
        };
        self
    }

    /// Attach an age (validated)
    pub fn with_age(mut self, age: u8) -> Result<Self> {
        self.age = Some(age);
        self.validate()?;
        Ok(self)
    }

    /// Check the range constraints the input surface is expected to enforce
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("income", self.income),
            ("expenses", self.expenses),
            ("savings", self.savings),
            ("debt", self.debt),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidInput(format!("{field} must be a finite number")));
            }
            if value < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "{field} must be non-negative (got {value})"
                )));
            }
        }

        if self.emergency_fund_months > MAX_EMERGENCY_FUND_MONTHS {
            return Err(Error::InvalidInput(format!(
                "emergency_fund_months must be between 0 and {MAX_EMERGENCY_FUND_MONTHS} (got {})",
                self.emergency_fund_months
            )));
        }

        if let Some(age) = self.age {
            if !(MIN_AGE..=MAX_AGE).contains(&age) {
                return Err(Error::InvalidInput(format!(
                    "age must be between {MIN_AGE} and {MAX_AGE} (got {age})"
                )));
            }
        }

        Ok(())
    }
}

/// Ratios shown next to the score. `None` when income is zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub savings_rate_pct: Option<f64>,
    pub debt_to_income_pct: Option<f64>,
    pub expense_ratio_pct: Option<f64>,
}

impl DerivedMetrics {
    pub fn from_record(record: &UserFinancialRecord) -> Self {
        let pct = |value: f64| {
            if record.income > 0.0 {
                Some(value / record.income * 100.0)
            } else {
                None
            }
        };

        Self {
            savings_rate_pct: pct(record.savings),
            debt_to_income_pct: pct(record.debt),
            expense_ratio_pct: pct(record.expenses),
        }
    }
}

/// Spending persona predicted by the cluster model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Persona {
    StableSaver,
    OverSpender,
    AtRisk,
    BreakEvener,
    /// Cluster id with no entry in the persona table
    Unknown { cluster: usize },
}

impl Persona {
    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::StableSaver => "stable_saver",
            Persona::OverSpender => "over_spender",
            Persona::AtRisk => "at_risk",
            Persona::BreakEvener => "break_evener",
            Persona::Unknown { .. } => "unknown",
        }
    }

    /// Human-readable label for reports
    pub fn label(&self) -> &'static str {
        match self {
            Persona::StableSaver => "Stable Saver",
            Persona::OverSpender => "Over-Spender",
            Persona::AtRisk => "At-Risk",
            Persona::BreakEvener => "Break-Evener",
            Persona::Unknown { .. } => "Unknown",
        }
    }

    /// One-line description of the spending pattern
    pub fn description(&self) -> &'static str {
        match self {
            Persona::StableSaver => "Consistently saves a healthy share of income.",
            Persona::OverSpender => "Spending regularly outpaces what income supports.",
            Persona::AtRisk => "Debt and thin buffers leave little room for surprises.",
            Persona::BreakEvener => "Income and spending roughly cancel out each month.",
            Persona::Unknown { .. } => "The model returned a cluster with no known persona.",
        }
    }

    pub fn is_over_spending(&self) -> bool {
        matches!(self, Persona::OverSpender)
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Persona::Unknown { cluster } => write!(f, "Unknown (cluster {cluster})"),
            other => write!(f, "{}", other.label()),
        }
    }
}

impl FromStr for Persona {
    type Err = String;

    /// Parse a configured persona label. `unknown` is not a valid target.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "stable_saver" => Ok(Persona::StableSaver),
            "over_spender" => Ok(Persona::OverSpender),
            "at_risk" => Ok(Persona::AtRisk),
            "break_evener" => Ok(Persona::BreakEvener),
            _ => Err(format!("Unknown persona label: {}", s)),
        }
    }
}

impl Serialize for Persona {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Binary risk indicator from the stress classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressLevel {
    High,
    Low,
}

impl StressLevel {
    pub fn from_flag(stressed: bool) -> Self {
        if stressed {
            StressLevel::High
        } else {
            StressLevel::Low
        }
    }

    /// Wire name, identical to the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            StressLevel::High => "high",
            StressLevel::Low => "low",
        }
    }

    /// Human-readable label for reports
    pub fn label(&self) -> &'static str {
        match self {
            StressLevel::High => "High",
            StressLevel::Low => "Low",
        }
    }
}

impl fmt::Display for StressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Values for the expenses-vs-savings proportion chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartData {
    pub expenses: f64,
    pub savings: f64,
    pub expenses_share_pct: f64,
    pub savings_share_pct: f64,
}

impl ChartData {
    pub fn from_record(record: &UserFinancialRecord) -> Self {
        let total = record.expenses + record.savings;
        let (expenses_share_pct, savings_share_pct) = if total > 0.0 {
            (
                record.expenses / total * 100.0,
                record.savings / total * 100.0,
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            expenses: record.expenses,
            savings: record.savings,
            expenses_share_pct,
            savings_share_pct,
        }
    }
}

/// Everything the presentation layer needs for one submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    pub score: u32,
    pub max_score: u32,
    pub breakdown: Vec<ScoreCheck>,
    /// Raw cluster id, kept so an unmapped cluster stays identifiable
    pub cluster: usize,
    pub persona: Persona,
    pub stress_level: StressLevel,
    pub predicted_next_month_savings: f64,
    pub tips: Vec<String>,
    pub metrics: DerivedMetrics,
    pub chart: ChartData,
    /// Fingerprint of the model bundle that produced the prediction
    pub model_fingerprint: String,
}
