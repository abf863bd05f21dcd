//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use wealthy_core::UserFinancialRecord;

/// Wealthy Ways - Financial wellbeing profiler
#[derive(Parser)]
#[command(name = "wealthy")]
#[command(about = "Score your finances, find your spending persona, get tips", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ~/.local/share/wealthy/config/wealthy.toml, then built-in)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the model artifacts (overrides [models].dir)
    #[arg(long, global = true)]
    pub models_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// One month of finances, as entered on the command line
#[derive(Args, Debug, Clone)]
pub struct RecordArgs {
    /// Monthly income
    #[arg(long)]
    pub income: f64,

    /// Monthly expenses
    #[arg(long)]
    pub expenses: f64,

    /// Monthly savings
    #[arg(long)]
    pub savings: f64,

    /// Total debt
    #[arg(long)]
    pub debt: f64,

    /// Months of expenses covered by the emergency fund (0-12)
    #[arg(long, default_value = "3")]
    pub emergency_months: u8,

    /// Keeps a monthly budget
    #[arg(long)]
    pub budgets: bool,

    /// Name shown on the report
    #[arg(long)]
    pub name: Option<String>,

    /// Age shown on the report (10-100)
    #[arg(long)]
    pub age: Option<u8>,
}

impl RecordArgs {
    /// Build a validated record
    pub fn to_record(&self) -> wealthy_core::Result<UserFinancialRecord> {
        let mut record = UserFinancialRecord::new(
            self.income,
            self.expenses,
            self.savings,
            self.debt,
            self.emergency_months,
            self.budgets,
        )?;
        if let Some(name) = &self.name {
            record = record.with_name(name.as_str());
        }
        if let Some(age) = self.age {
            record = record.with_age(age)?;
        }
        Ok(record)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a financial record and print the snapshot
    Assess {
        #[command(flatten)]
        record: RecordArgs,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate a financial record and write the summary document
    Report {
        #[command(flatten)]
        record: RecordArgs,

        /// Output format: text, json, csv
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Output file or directory (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the active feature schema, scoring scale and persona table
    Schema,

    /// Load the model bundle and show its artifacts and fingerprint
    Models,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Origin allowed to call the API cross-site (repeatable)
        #[arg(long = "allow-origin")]
        allow_origin: Vec<String>,
    },
}
