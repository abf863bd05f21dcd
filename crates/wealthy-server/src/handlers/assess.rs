//! Assessment handler

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use wealthy_core::{EvaluationResult, UserFinancialRecord};

use super::record_from_body;
use crate::{AppError, AppState};

/// POST /api/assess - Score, profile and advise one financial record
pub async fn assess(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UserFinancialRecord>, JsonRejection>,
) -> Result<Json<EvaluationResult>, AppError> {
    let record = record_from_body(payload)?;
    let result = state.pipeline.evaluate(&record)?;
    Ok(Json(result))
}
