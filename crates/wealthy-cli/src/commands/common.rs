//! Shared command utilities
//!
//! - `load_config` - Resolve the configuration and apply CLI overrides
//! - `open_pipeline` - Load the model bundle and build the pipeline

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use wealthy_core::{AppConfig, ModelBundle, Pipeline};

/// Load configuration, with `--models-dir` taking precedence over the file
pub fn load_config(config_path: Option<&Path>, models_dir: Option<&Path>) -> Result<AppConfig> {
    let mut config = AppConfig::load(config_path).context("Failed to load configuration")?;
    if let Some(dir) = models_dir {
        config.models.dir = dir.to_path_buf();
    }
    Ok(config)
}

/// Load the model bundle named by the config
pub fn open_pipeline(config: AppConfig) -> Result<Arc<Pipeline>> {
    let bundle = ModelBundle::load(&config.models, config.schema.clone()).with_context(|| {
        format!(
            "Failed to load model bundle from {}",
            config.models.dir.display()
        )
    })?;
    let pipeline = Pipeline::new(config, Arc::new(bundle))?;
    Ok(Arc::new(pipeline))
}
