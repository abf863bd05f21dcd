//! Downloadable summary document
//!
//! A report is a flat, ordered list of labelled values plus the tips. It is
//! rendered as plain text, JSON or CSV (`key,value` rows).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::PresentationConfig;
use crate::error::Result;
use crate::models::{ChartData, EvaluationResult, UserFinancialRecord};

const REPORT_TITLE: &str = "Wealthy Ways Report";
const FILE_STEM: &str = "WealthyWays_Report";

/// Output format for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Text => "text/plain; charset=utf-8",
            ReportFormat::Json => "application/json",
            ReportFormat::Csv => "text/csv; charset=utf-8",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

/// One labelled line of the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub key: String,
    pub value: String,
}

impl ReportEntry {
    fn new(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
        }
    }
}

/// Summary of one evaluation, ready to render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<ReportEntry>,
    pub tips: Vec<String>,
    pub model_fingerprint: String,
}

impl ReportDocument {
    pub fn build(
        record: &UserFinancialRecord,
        result: &EvaluationResult,
        presentation: &PresentationConfig,
    ) -> Self {
        Self::build_at(record, result, presentation, Utc::now())
    }

    /// Same as `build` with a fixed timestamp
    pub fn build_at(
        record: &UserFinancialRecord,
        result: &EvaluationResult,
        presentation: &PresentationConfig,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let currency = presentation.currency_symbol.as_str();
        let mut entries = Vec::with_capacity(16);

        if let Some(name) = &record.name {
            entries.push(ReportEntry::new("Name", name.as_str()));
        }
        if let Some(age) = record.age {
            entries.push(ReportEntry::new("Age", age.to_string()));
        }

        entries.push(ReportEntry::new("Income", money(currency, record.income)));
        entries.push(ReportEntry::new("Expenses", money(currency, record.expenses)));
        entries.push(ReportEntry::new("Savings", money(currency, record.savings)));
        entries.push(ReportEntry::new("Debt", money(currency, record.debt)));
        entries.push(ReportEntry::new(
            "Emergency Fund (months)",
            record.emergency_fund_months.to_string(),
        ));
        entries.push(ReportEntry::new(
            "Budgets Monthly",
            if record.budgets_monthly { "Yes" } else { "No" },
        ));

        entries.push(ReportEntry::new(
            "Score",
            format!("{}/{}", result.score, result.max_score),
        ));
        entries.push(ReportEntry::new(
            "Savings Rate",
            percent(result.metrics.savings_rate_pct),
        ));
        entries.push(ReportEntry::new(
            "Debt-to-Income Ratio",
            percent(result.metrics.debt_to_income_pct),
        ));
        entries.push(ReportEntry::new(
            "Expense Ratio",
            percent(result.metrics.expense_ratio_pct),
        ));
        entries.push(ReportEntry::new("Persona", result.persona.to_string()));
        entries.push(ReportEntry::new("Stress", result.stress_level.label()));
        entries.push(ReportEntry::new(
            "Next Savings",
            money(currency, result.predicted_next_month_savings),
        ));

        let title = match &record.name {
            Some(name) => format!("{} for {}", REPORT_TITLE, name),
            None => REPORT_TITLE.to_string(),
        };

        Self {
            title,
            name: record.name.clone(),
            generated_at,
            entries,
            tips: result.tips.clone(),
            model_fingerprint: result.model_fingerprint.clone(),
        }
    }

    /// Value of the first entry with this key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// `<name>_WealthyWays_Report.<ext>`, or without the prefix when unnamed
    pub fn suggested_file_name(&self, format: ReportFormat) -> String {
        let stem = match self.name.as_deref().map(sanitize_file_part) {
            Some(prefix) if !prefix.is_empty() => format!("{}_{}", prefix, FILE_STEM),
            _ => FILE_STEM.to_string(),
        };
        format!("{}.{}", stem, format.extension())
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            ReportFormat::Csv => self.render_csv(),
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&"=".repeat(self.title.chars().count()));
        out.push('\n');

        for entry in &self.entries {
            out.push_str(&format!("{}: {}\n", entry.key, entry.value));
        }

        out.push_str("\nTips:\n");
        for tip in &self.tips {
            out.push_str(&format!("- {}\n", tip));
        }

        out.push_str(&format!(
            "\nGenerated: {}\nModel: {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.model_fingerprint
        ));
        out
    }

    fn render_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["key", "value"])?;
        for entry in &self.entries {
            writer.write_record([entry.key.as_str(), entry.value.as_str()])?;
        }
        for tip in &self.tips {
            writer.write_record(["Tip", tip.as_str()])?;
        }
        let generated = self.generated_at.to_rfc3339();
        writer.write_record(["Generated", generated.as_str()])?;
        writer.write_record(["Model", self.model_fingerprint.as_str()])?;

        let bytes = writer
            .into_inner()
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl ChartData {
    /// Two-row horizontal bar chart for terminals
    pub fn text_bar(&self, width: usize) -> String {
        let bar = |share: f64| {
            let filled = ((share / 100.0) * width as f64).round() as usize;
            let filled = filled.min(width);
            format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
        };

        format!(
            "Expenses [{}] {:5.1}%\nSavings  [{}] {:5.1}%",
            bar(self.expenses_share_pct),
            self.expenses_share_pct,
            bar(self.savings_share_pct),
            self.savings_share_pct
        )
    }
}

/// Format a money amount with the configured currency symbol
pub fn money(currency: &str, value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}{:.0}", currency, value)
    } else {
        format!("{}{:.2}", currency, value)
    }
}

fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v),
        None => "n/a".to_string(),
    }
}

fn sanitize_file_part(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
