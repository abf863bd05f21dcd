//! Integration tests for wealthy-core
//!
//! These tests load the demo model bundle shipped in `models/` and run full
//! record → score → profile → tips → report evaluations.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use wealthy_core::{
    advisor::{TIP_AUTOMATE, TIP_HIGH_STRESS, TIP_OVERSPENDING, TIP_SAVING_BELOW_PREDICTION},
    predictors::FailingModel,
    AppConfig, Error, FeatureSchema, ModelBundle, ModelFiles, Normalizer, Persona, Pipeline,
    ReportDocument, ReportFormat, StressLevel, UserFinancialRecord,
};

fn shipped_models_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../models")
}

fn shipped_pipeline() -> Pipeline {
    let mut config = AppConfig::embedded().expect("embedded config parses");
    config.models.dir = shipped_models_dir();
    Pipeline::from_config(config).expect("shipped models load")
}

fn healthy_record() -> UserFinancialRecord {
    UserFinancialRecord::new(50000.0, 20000.0, 15000.0, 5000.0, 4, true).unwrap()
}

fn stretched_record() -> UserFinancialRecord {
    UserFinancialRecord::new(30000.0, 45000.0, 1000.0, 25000.0, 0, false).unwrap()
}

// =============================================================================
// Shipped bundle
// =============================================================================

#[test]
fn test_shipped_bundle_loads() {
    let pipeline = shipped_pipeline();
    let info = pipeline.bundle().info();

    assert_eq!(info.schema_version, "full6-v1");
    assert_eq!(info.features.len(), 6);
    assert_eq!(info.normalizer, "standard");
    assert_eq!(info.fingerprint.len(), 64);
}

#[test]
fn test_healthy_record_end_to_end() {
    let result = shipped_pipeline().evaluate(&healthy_record()).unwrap();

    assert_eq!(result.score, 100);
    assert_eq!(result.max_score, 100);
    assert_eq!(result.persona, Persona::StableSaver);
    assert_eq!(result.stress_level, StressLevel::Low);
    assert!((result.predicted_next_month_savings - 16650.0).abs() <= 1.0);
    // truncated, never fractional
    assert_eq!(result.predicted_next_month_savings.fract(), 0.0);
    assert_eq!(result.tips, vec![TIP_SAVING_BELOW_PREDICTION, TIP_AUTOMATE]);
}

#[test]
fn test_stretched_record_end_to_end() {
    let result = shipped_pipeline().evaluate(&stretched_record()).unwrap();

    assert_eq!(result.score, 0);
    assert_eq!(result.persona, Persona::OverSpender);
    assert_eq!(result.stress_level, StressLevel::High);
    assert!(result.predicted_next_month_savings < 0.0);
    assert_eq!(
        result.tips,
        vec![TIP_OVERSPENDING, TIP_HIGH_STRESS, TIP_AUTOMATE]
    );
}

#[test]
fn test_zero_income_is_defined() {
    let record = UserFinancialRecord::new(0.0, 0.0, 0.0, 0.0, 6, true).unwrap();
    let result = shipped_pipeline().evaluate(&record).unwrap();

    // only emergency fund and budgeting can score
    assert_eq!(result.score, 40);
    assert_eq!(result.metrics.savings_rate_pct, None);
    assert_eq!(result.chart.expenses_share_pct, 0.0);
    assert_eq!(result.tips.last().map(String::as_str), Some(TIP_AUTOMATE));
}

#[test]
fn test_evaluation_is_deterministic() {
    let pipeline = shipped_pipeline();
    let a = pipeline.evaluate(&stretched_record()).unwrap();
    let b = pipeline.evaluate(&stretched_record()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_report_from_shipped_bundle() {
    let pipeline = shipped_pipeline();
    let record = healthy_record().with_name("Asha");
    let result = pipeline.evaluate(&record).unwrap();
    let doc = ReportDocument::build(&record, &result, &pipeline.config().presentation);

    assert_eq!(doc.get("Persona"), Some("Stable Saver"));
    assert_eq!(doc.get("Score"), Some("100/100"));
    assert_eq!(
        doc.suggested_file_name(ReportFormat::Json),
        "Asha_WealthyWays_Report.json"
    );

    let csv = doc.render(ReportFormat::Csv).unwrap();
    assert!(csv.contains(&format!("Model,{}", pipeline.bundle().fingerprint())));
}

// =============================================================================
// Failure modes
// =============================================================================

fn copy_shipped_models(dir: &Path) {
    for name in [
        "kmeans.json",
        "stress_classifier.json",
        "savings_regressor.json",
        "scaler.json",
    ] {
        fs::copy(shipped_models_dir().join(name), dir.join(name)).unwrap();
    }
}

#[test]
fn test_feature_order_drift_fails_at_load() {
    let dir = TempDir::new().unwrap();
    copy_shipped_models(dir.path());

    // swap two feature names in the regressor
    let path = dir.path().join("savings_regressor.json");
    let body = fs::read_to_string(&path)
        .unwrap()
        .replace("\"income\",\"expenses\"", "\"expenses\",\"income\"");
    fs::write(&path, body).unwrap();

    let files = ModelFiles::default().in_dir(dir.path());
    let err = ModelBundle::load(&files, FeatureSchema::full6_v1()).unwrap_err();
    assert!(
        matches!(err, Error::SchemaMismatch { ref model, .. } if model == "savings_regressor.json")
    );
}

#[test]
fn test_missing_artifact_fails_at_load() {
    let dir = TempDir::new().unwrap();
    copy_shipped_models(dir.path());
    fs::remove_file(dir.path().join("stress_classifier.json")).unwrap();

    let mut config = AppConfig::embedded().unwrap();
    config.models.dir = dir.path().to_path_buf();
    let err = Pipeline::from_config(config).unwrap_err();
    assert!(matches!(err, Error::ModelUnavailable { .. }));
}

#[test]
fn test_shipped_bundle_rejects_core4_schema() {
    let files = ModelFiles::default().in_dir(shipped_models_dir());
    let err = ModelBundle::load(&files, FeatureSchema::core4_v1()).unwrap_err();
    assert!(matches!(err, Error::SchemaMismatch { .. }));
}

#[test]
fn test_failing_model_aborts_without_partial_result() {
    let schema = FeatureSchema::full6_v1();
    let bundle = ModelBundle::new(
        schema,
        Normalizer::Identity,
        Arc::new(wealthy_core::predictors::FixedCluster(0)),
        Arc::new(FailingModel::new("stress_classifier")),
        Arc::new(wealthy_core::predictors::FixedSavings(0.0)),
    )
    .unwrap();
    let pipeline = Pipeline::new(AppConfig::default(), Arc::new(bundle)).unwrap();

    let err = pipeline.evaluate(&healthy_record()).unwrap_err();
    assert!(
        matches!(err, Error::ModelUnavailable { ref model, .. } if model == "stress_classifier")
    );
}

#[test]
fn test_unmapped_cluster_surfaces_as_unknown() {
    let bundle = ModelBundle::fixed(FeatureSchema::full6_v1(), 9, false, 0.0);
    let pipeline = Pipeline::new(AppConfig::default(), Arc::new(bundle)).unwrap();

    let result = pipeline.evaluate(&healthy_record()).unwrap();
    assert_eq!(result.cluster, 9);
    assert_eq!(result.persona, Persona::Unknown { cluster: 9 });
    assert_eq!(result.tips, vec![TIP_AUTOMATE]);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["cluster"], 9);
    assert_eq!(json["persona"], "unknown");
}

#[test]
fn test_config_file_overrides() {
    let dir = TempDir::new().unwrap();
    copy_shipped_models(dir.path());
    let config_path = dir.path().join("wealthy.toml");
    fs::write(
        &config_path,
        format!(
            "[scoring]\nvariant = \"tiered\"\n\n[models]\ndir = {:?}\n\n[presentation]\nrounding = \"none\"\n",
            dir.path().display().to_string()
        ),
    )
    .unwrap();

    let config = AppConfig::load(Some(&config_path)).unwrap();
    let pipeline = Pipeline::from_config(config).unwrap();
    let result = pipeline.evaluate(&healthy_record()).unwrap();

    assert_eq!(result.max_score, 6);
    assert_eq!(result.score, 6);
    assert!((result.predicted_next_month_savings - 16650.0).abs() < 1e-6);
}
