//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tempfile::TempDir;
use wealthy_core::{AppConfig, FeatureSchema, ModelBundle, Pipeline, ReportFormat};

use crate::cli::{Cli, Commands, RecordArgs};
use crate::commands;

fn shipped_models_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../models")
}

fn fixed_pipeline() -> Pipeline {
    let bundle = ModelBundle::fixed(FeatureSchema::full6_v1(), 1, true, 4000.0);
    Pipeline::new(AppConfig::default(), Arc::new(bundle)).unwrap()
}

fn record_args() -> RecordArgs {
    RecordArgs {
        income: 50000.0,
        expenses: 20000.0,
        savings: 15000.0,
        debt: 5000.0,
        emergency_months: 4,
        budgets: true,
        name: None,
        age: None,
    }
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_assess() {
    let cli = Cli::try_parse_from([
        "wealthy",
        "assess",
        "--income",
        "50000",
        "--expenses",
        "20000",
        "--savings",
        "15000",
        "--debt",
        "5000",
        "--budgets",
        "--json",
    ])
    .unwrap();

    match cli.command {
        Commands::Assess { record, json } => {
            assert!(json);
            assert!(record.budgets);
            // slider default
            assert_eq!(record.emergency_months, 3);
            assert_eq!(record.income, 50000.0);
        }
        _ => panic!("expected assess"),
    }
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "wealthy",
        "schema",
        "--config",
        "custom.toml",
        "--models-dir",
        "/opt/models",
        "-v",
    ])
    .unwrap();

    assert!(cli.verbose);
    assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    assert_eq!(cli.models_dir, Some(PathBuf::from("/opt/models")));
    assert!(matches!(cli.command, Commands::Schema));
}

#[test]
fn test_parse_requires_money_fields() {
    assert!(Cli::try_parse_from(["wealthy", "assess", "--income", "100"]).is_err());
}

#[test]
fn test_parse_report_defaults_to_text() {
    let cli = Cli::try_parse_from([
        "wealthy", "report", "--income", "1", "--expenses", "1", "--savings", "1", "--debt",
        "1",
    ])
    .unwrap();

    match cli.command {
        Commands::Report { format, output, .. } => {
            assert_eq!(format, "text");
            assert!(output.is_none());
        }
        _ => panic!("expected report"),
    }
}

#[test]
fn test_parse_serve_allow_origins() {
    let cli = Cli::try_parse_from([
        "wealthy",
        "serve",
        "--allow-origin",
        "http://localhost:5173",
        "--allow-origin",
        "https://wealthy.example",
    ])
    .unwrap();

    match cli.command {
        Commands::Serve {
            port,
            host,
            allow_origin,
        } => {
            assert_eq!(port, 3000);
            assert_eq!(host, "127.0.0.1");
            assert_eq!(
                allow_origin,
                vec!["http://localhost:5173", "https://wealthy.example"]
            );
        }
        _ => panic!("expected serve"),
    }
}

#[test]
fn test_record_args_validation() {
    let mut args = record_args();
    args.emergency_months = 13;
    assert!(args.to_record().is_err());

    let mut args = record_args();
    args.age = Some(5);
    assert!(args.to_record().is_err());

    let mut args = record_args();
    args.name = Some("  Asha ".to_string());
    args.age = Some(30);
    let record = args.to_record().unwrap();
    assert_eq!(record.name.as_deref(), Some("Asha"));
    assert_eq!(record.age, Some(30));
}

// ========== Command Tests ==========

#[test]
fn test_render_snapshot() {
    let pipeline = fixed_pipeline();
    let record = record_args().to_record().unwrap();
    let result = pipeline.evaluate(&record).unwrap();

    let text = commands::render_snapshot(&result, Some("Asha"), &pipeline.config().presentation);
    assert!(text.contains("Hi Asha"));
    assert!(text.contains("100/100"));
    assert!(text.contains("Over-Spender"));
    assert!(text.contains("High"));
    assert!(text.contains("₹4000"));
    assert!(text.contains("Expenses ["));
    assert!(text.contains("- Automate savings if you can."));
}

#[test]
fn test_cmd_assess() {
    let pipeline = fixed_pipeline();
    assert!(commands::cmd_assess(&pipeline, &record_args(), false).is_ok());
    assert!(commands::cmd_assess(&pipeline, &record_args(), true).is_ok());
}

#[test]
fn test_cmd_assess_invalid_record() {
    let pipeline = fixed_pipeline();
    let mut args = record_args();
    args.income = -1.0;
    assert!(commands::cmd_assess(&pipeline, &args, false).is_err());
}

#[test]
fn test_write_report_to_directory() {
    let dir = TempDir::new().unwrap();
    let pipeline = fixed_pipeline();
    let mut args = record_args();
    args.name = Some("Asha".to_string());

    let path = commands::write_report(&pipeline, &args, ReportFormat::Csv, Some(dir.path()))
        .unwrap()
        .unwrap();

    assert_eq!(path, dir.path().join("Asha_WealthyWays_Report.csv"));
    let body = std::fs::read_to_string(&path).unwrap();
    assert!(body.starts_with("key,value\n"));
    assert!(body.contains("Persona,Over-Spender"));
}

#[test]
fn test_write_report_to_file() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("snapshot.json");
    let pipeline = fixed_pipeline();

    let path = commands::write_report(&pipeline, &record_args(), ReportFormat::Json, Some(&target))
        .unwrap()
        .unwrap();

    assert_eq!(path, target);
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["title"], "Wealthy Ways Report");
}

#[test]
fn test_cmd_report_rejects_unknown_format() {
    let pipeline = fixed_pipeline();
    assert!(commands::cmd_report(&pipeline, &record_args(), "pdf", None).is_err());
}

#[test]
fn test_load_config_models_dir_override() {
    let config = commands::load_config(None, Some(Path::new("/opt/wealthy/models"))).unwrap();
    assert_eq!(config.models.dir, PathBuf::from("/opt/wealthy/models"));
}

#[test]
fn test_load_config_missing_file() {
    assert!(commands::load_config(Some(Path::new("/nonexistent/wealthy.toml")), None).is_err());
}

#[test]
fn test_open_pipeline_with_shipped_models() {
    let mut config = AppConfig::embedded().unwrap();
    config.models.dir = shipped_models_dir();

    let pipeline = commands::open_pipeline(config).unwrap();
    assert_eq!(pipeline.bundle().fingerprint().len(), 64);
    assert!(commands::cmd_models(&pipeline).is_ok());
}

#[test]
fn test_open_pipeline_missing_models() {
    let dir = TempDir::new().unwrap();
    let mut config = AppConfig::embedded().unwrap();
    config.models.dir = dir.path().to_path_buf();

    let err = commands::open_pipeline(config).unwrap_err();
    assert!(err.to_string().contains("Failed to load model bundle"));
}

#[test]
fn test_cmd_schema() {
    let config = AppConfig::embedded().unwrap();
    assert!(commands::cmd_schema(&config).is_ok());
}
