//! Assess command implementation

use anyhow::Result;
use wealthy_core::report::money;
use wealthy_core::{EvaluationResult, Pipeline, PresentationConfig, StressLevel};

use crate::cli::RecordArgs;

const CHART_WIDTH: usize = 30;

pub fn cmd_assess(pipeline: &Pipeline, args: &RecordArgs, json: bool) -> Result<()> {
    let record = args.to_record()?;
    let result = pipeline.evaluate(&record)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!(
            "{}",
            render_snapshot(&result, record.name.as_deref(), &pipeline.config().presentation)
        );
    }

    Ok(())
}

/// Human-readable snapshot of an evaluation
pub fn render_snapshot(
    result: &EvaluationResult,
    name: Option<&str>,
    presentation: &PresentationConfig,
) -> String {
    let mut out = String::new();
    let pct = |v: Option<f64>| match v {
        Some(v) => format!("{:.2}%", v),
        None => "n/a".to_string(),
    };

    match name {
        Some(name) => out.push_str(&format!("🧾 Hi {}, here's your Financial Wellness Snapshot\n\n", name)),
        None => out.push_str("🧾 Financial Wellness Snapshot\n\n"),
    }

    out.push_str(&format!(
        "💹 Score:                 {}/{}\n",
        result.score, result.max_score
    ));
    for check in &result.breakdown {
        let mark = if check.points > 0 { "✓" } else { "✗" };
        out.push_str(&format!(
            "   {} {:<15} {:>3}/{:<3} {}\n",
            mark,
            check.check.as_str(),
            check.points,
            check.max_points,
            check.note
        ));
    }

    out.push_str(&format!(
        "📊 Savings rate:          {}\n",
        pct(result.metrics.savings_rate_pct)
    ));
    out.push_str(&format!(
        "📉 Debt-to-income:        {}\n",
        pct(result.metrics.debt_to_income_pct)
    ));
    out.push_str(&format!("🧠 Persona:               {}\n", result.persona));
    out.push_str(&format!(
        "{} Stress level:          {}\n",
        match result.stress_level {
            StressLevel::High => "⚠️ ",
            StressLevel::Low => "✅",
        },
        result.stress_level
    ));
    out.push_str(&format!(
        "🔮 Predicted savings:     {}\n",
        money(&presentation.currency_symbol, result.predicted_next_month_savings)
    ));

    out.push('\n');
    out.push_str(&result.chart.text_bar(CHART_WIDTH));
    out.push_str("\n\n💬 Recommendations\n");
    for tip in &result.tips {
        out.push_str(&format!("   - {}\n", tip));
    }

    out
}
