//! Schema and model bundle inspection commands

use anyhow::Result;
use wealthy_core::{AppConfig, Pipeline};

pub fn cmd_schema(config: &AppConfig) -> Result<()> {
    println!("📐 Feature schema: {}", config.schema.version);
    for (idx, name) in config.schema.names().iter().enumerate() {
        println!("   {}. {}", idx + 1, name);
    }

    println!();
    println!(
        "💹 Scoring: {} (max {})",
        config.scoring.variant,
        config.scoring.max_score()
    );

    println!();
    println!("🧠 Personas:");
    for (cluster, persona) in config.personas.entries() {
        println!("   {} → {}", cluster, persona.label());
    }

    println!();
    match &config.source {
        Some(path) => println!("Config: {}", path.display()),
        None => println!("Config: built-in defaults"),
    }

    Ok(())
}

pub fn cmd_models(pipeline: &Pipeline) -> Result<()> {
    let info = pipeline.bundle().info();
    let files = &pipeline.config().models;

    println!("🤖 Model bundle ({})", files.dir.display());
    println!("   Cluster:     {} ({})", files.cluster, info.cluster_model);
    println!("   Stress:      {} ({})", files.stress, info.stress_model);
    println!("   Savings:     {} ({})", files.savings, info.savings_model);
    println!(
        "   Scaler:      {} ({})",
        files.scaler.as_deref().unwrap_or("none"),
        info.normalizer
    );
    println!("   Schema:      {} [{}]", info.schema_version, info.features.join(", "));
    println!("   Fingerprint: {}", info.fingerprint);

    Ok(())
}
