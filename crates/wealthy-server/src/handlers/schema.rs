//! Health, schema and model bundle handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use wealthy_core::BundleInfo;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Serialize)]
pub struct SchemaResponse {
    pub schema_version: String,
    pub features: Vec<&'static str>,
    pub scoring_variant: &'static str,
    pub max_score: u32,
    /// Cluster id to persona key
    pub personas: BTreeMap<usize, &'static str>,
}

/// GET /api/schema - Active feature schema, scoring scale and persona table
pub async fn get_schema(State(state): State<Arc<AppState>>) -> Json<SchemaResponse> {
    let config = state.pipeline.config();

    Json(SchemaResponse {
        schema_version: config.schema.version.clone(),
        features: config.schema.names(),
        scoring_variant: config.scoring.variant.as_str(),
        max_score: config.scoring.max_score(),
        personas: config
            .personas
            .entries()
            .map(|(id, persona)| (*id, persona.as_str()))
            .collect(),
    })
}

/// GET /api/models - Loaded model bundle
pub async fn get_models(State(state): State<Arc<AppState>>) -> Json<BundleInfo> {
    Json(state.pipeline.bundle().info())
}
