//! Rule-based wellness scoring
//!
//! The score is a sum of independent threshold checks. Each check earns its
//! points when the predicate holds and nothing otherwise; no check affects
//! another. Two variants are supported:
//!
//! - `Percent` (0-100): five equally weighted checks covering savings rate,
//!   expense ratio, debt ratio, emergency fund and budgeting habit.
//! - `Tiered` (0-6): three ratio checks worth 2 points, or 1 point at a
//!   looser tier.
//!
//! Ratio checks need a positive income. With zero income they are false and
//! contribute nothing; no division is attempted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::UserFinancialRecord;

/// Tiered variant thresholds (percentages of income)
const TIER_SAVINGS_RATE_HIGH: f64 = 20.0;
const TIER_SAVINGS_RATE_LOW: f64 = 10.0;
const TIER_DEBT_RATIO_HIGH: f64 = 20.0;
const TIER_DEBT_RATIO_LOW: f64 = 35.0;
const TIER_FULL_POINTS: u32 = 2;
const TIER_PARTIAL_POINTS: u32 = 1;

/// Which scoring scale to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringVariant {
    /// Five checks, 0-100
    Percent,
    /// Three tiered ratio checks, 0-6
    Tiered,
}

impl ScoringVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringVariant::Percent => "percent",
            ScoringVariant::Tiered => "tiered",
        }
    }
}

impl fmt::Display for ScoringVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScoringVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "percent" => Ok(ScoringVariant::Percent),
            "tiered" => Ok(ScoringVariant::Tiered),
            _ => Err(format!("Unknown scoring variant: {}", s)),
        }
    }
}

/// The individual checks that make up a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    SavingsRate,
    ExpenseRatio,
    DebtRatio,
    EmergencyFund,
    Budgeting,
}

impl CheckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::SavingsRate => "savings_rate",
            CheckKind::ExpenseRatio => "expense_ratio",
            CheckKind::DebtRatio => "debt_ratio",
            CheckKind::EmergencyFund => "emergency_fund",
            CheckKind::Budgeting => "budgeting",
        }
    }
}

/// Outcome of one check, kept for the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCheck {
    pub check: CheckKind,
    pub points: u32,
    pub max_points: u32,
    pub note: String,
}

/// Total score plus per-check breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Score {
    pub value: u32,
    pub max: u32,
    pub checks: Vec<ScoreCheck>,
}

/// Thresholds and weights for the scorer
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringPolicy {
    pub variant: ScoringVariant,
    /// Savings must exceed this fraction of income
    pub savings_rate_min: f64,
    /// Expenses must stay below this fraction of income
    pub expense_ratio_max: f64,
    /// Debt must stay below this fraction of income
    pub debt_ratio_max: f64,
    /// Minimum months of expenses held in reserve
    pub emergency_months_min: u8,
    /// Points per check in the percent variant
    pub points_per_check: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            variant: ScoringVariant::Percent,
            savings_rate_min: 0.2,
            expense_ratio_max: 0.5,
            debt_ratio_max: 0.3,
            emergency_months_min: 3,
            points_per_check: 20,
        }
    }
}

/// Checks summed by the percent variant
const PERCENT_CHECKS: u32 = 5;

/// Largest per-check weight whose total still fits in a `u32`
pub const MAX_POINTS_PER_CHECK: u32 = u32::MAX / PERCENT_CHECKS;

impl ScoringPolicy {
    /// Tiered 0-6 policy
    pub fn tiered() -> Self {
        Self {
            variant: ScoringVariant::Tiered,
            ..Default::default()
        }
    }

    /// Reject thresholds that would make the score meaningless
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("savings_rate_min", self.savings_rate_min),
            ("expense_ratio_max", self.expense_ratio_max),
            ("debt_ratio_max", self.debt_ratio_max),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "scoring.{name} must be a non-negative number (got {value})"
                )));
            }
        }
        if self.emergency_months_min > crate::models::MAX_EMERGENCY_FUND_MONTHS {
            return Err(Error::Config(format!(
                "scoring.emergency_months_min must be at most {}",
                crate::models::MAX_EMERGENCY_FUND_MONTHS
            )));
        }
        if self.points_per_check > MAX_POINTS_PER_CHECK {
            return Err(Error::Config(format!(
                "scoring.points_per_check must be at most {} (got {})",
                MAX_POINTS_PER_CHECK, self.points_per_check
            )));
        }
        Ok(())
    }

    /// Highest achievable score under this policy
    pub fn max_score(&self) -> u32 {
        match self.variant {
            ScoringVariant::Percent => self.points_per_check.saturating_mul(PERCENT_CHECKS),
            ScoringVariant::Tiered => TIER_FULL_POINTS * 3,
        }
    }
}

/// Stateless scorer over a fixed policy
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    policy: ScoringPolicy,
}

impl Scorer {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn max_score(&self) -> u32 {
        self.policy.max_score()
    }

    /// Score a record. Total for every valid record, including zero income.
    pub fn score(&self, record: &UserFinancialRecord) -> Score {
        let checks = match self.policy.variant {
            ScoringVariant::Percent => percent_checks(record, &self.policy),
            ScoringVariant::Tiered => tiered_checks(record),
        };
        let value = checks.iter().fold(0u32, |acc, c| acc.saturating_add(c.points));

        tracing::debug!(
            variant = self.policy.variant.as_str(),
            score = value,
            max = self.policy.max_score(),
            "Scored record"
        );

        Score {
            value,
            max: self.policy.max_score(),
            checks,
        }
    }
}

/// Score with the default percent policy
pub fn score(record: &UserFinancialRecord) -> u32 {
    Scorer::default().score(record).value
}

fn percent_checks(record: &UserFinancialRecord, policy: &ScoringPolicy) -> Vec<ScoreCheck> {
    let weight = policy.points_per_check;
    let has_income = record.income > 0.0;

    let check = |kind: CheckKind, met: bool, note: String| ScoreCheck {
        check: kind,
        points: if met { weight } else { 0 },
        max_points: weight,
        note,
    };

    let no_income = || "no income reported".to_string();

    vec![
        check(
            CheckKind::SavingsRate,
            has_income && record.savings > policy.savings_rate_min * record.income,
            if has_income {
                format!(
                    "savings {:.1}% of income (needs more than {:.0}%)",
                    record.savings / record.income * 100.0,
                    policy.savings_rate_min * 100.0
                )
            } else {
                no_income()
            },
        ),
        check(
            CheckKind::ExpenseRatio,
            has_income && record.expenses < policy.expense_ratio_max * record.income,
            if has_income {
                format!(
                    "expenses {:.1}% of income (needs less than {:.0}%)",
                    record.expenses / record.income * 100.0,
                    policy.expense_ratio_max * 100.0
                )
            } else {
                no_income()
            },
        ),
        check(
            CheckKind::DebtRatio,
            has_income && record.debt < policy.debt_ratio_max * record.income,
            if has_income {
                format!(
                    "debt {:.1}% of income (needs less than {:.0}%)",
                    record.debt / record.income * 100.0,
                    policy.debt_ratio_max * 100.0
                )
            } else {
                no_income()
            },
        ),
        check(
            CheckKind::EmergencyFund,
            record.emergency_fund_months >= policy.emergency_months_min,
            format!(
                "{} month(s) of emergency fund (needs {})",
                record.emergency_fund_months, policy.emergency_months_min
            ),
        ),
        check(
            CheckKind::Budgeting,
            record.budgets_monthly,
            if record.budgets_monthly {
                "tracks a monthly budget".to_string()
            } else {
                "no monthly budget".to_string()
            },
        ),
    ]
}

fn tiered_checks(record: &UserFinancialRecord) -> Vec<ScoreCheck> {
    if record.income <= 0.0 {
        return [CheckKind::SavingsRate, CheckKind::DebtRatio, CheckKind::ExpenseRatio]
            .into_iter()
            .map(|kind| ScoreCheck {
                check: kind,
                points: 0,
                max_points: TIER_FULL_POINTS,
                note: "no income reported".to_string(),
            })
            .collect();
    }

    let savings_rate = record.savings / record.income * 100.0;
    let debt_ratio = record.debt / record.income * 100.0;

    let savings_points = if savings_rate >= TIER_SAVINGS_RATE_HIGH {
        TIER_FULL_POINTS
    } else if savings_rate >= TIER_SAVINGS_RATE_LOW {
        TIER_PARTIAL_POINTS
    } else {
        0
    };

    let debt_points = if debt_ratio < TIER_DEBT_RATIO_HIGH {
        TIER_FULL_POINTS
    } else if debt_ratio < TIER_DEBT_RATIO_LOW {
        TIER_PARTIAL_POINTS
    } else {
        0
    };

    let expense_points = if record.expenses < record.income {
        TIER_FULL_POINTS
    } else if record.expenses == record.income {
        TIER_PARTIAL_POINTS
    } else {
        0
    };

    vec![
        ScoreCheck {
            check: CheckKind::SavingsRate,
            points: savings_points,
            max_points: TIER_FULL_POINTS,
            note: format!("savings rate {:.1}%", savings_rate),
        },
        ScoreCheck {
            check: CheckKind::DebtRatio,
            points: debt_points,
            max_points: TIER_FULL_POINTS,
            note: format!("debt-to-income {:.1}%", debt_ratio),
        },
        ScoreCheck {
            check: CheckKind::ExpenseRatio,
            points: expense_points,
            max_points: TIER_FULL_POINTS,
            note: if expense_points == TIER_FULL_POINTS {
                "spending below income".to_string()
            } else if expense_points == TIER_PARTIAL_POINTS {
                "spending equals income".to_string()
            } else {
                "spending exceeds income".to_string()
            },
        },
    ]
}
