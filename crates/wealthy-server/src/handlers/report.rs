//! Report download handler

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Query, State},
    http::{header, Response, StatusCode},
    Json,
};
use serde::Deserialize;
use tracing::info;

use wealthy_core::{ReportDocument, ReportFormat, UserFinancialRecord};

use super::record_from_body;
use crate::{AppError, AppState};

/// Query parameters for report download
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Output format: text, json or csv (default: text)
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// POST /api/report - Evaluate a record and return the summary as a download
pub async fn download_report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportQuery>,
    payload: Result<Json<UserFinancialRecord>, JsonRejection>,
) -> Result<Response<Body>, AppError> {
    let format: ReportFormat = params
        .format
        .parse()
        .map_err(|_| AppError::bad_request("Invalid format. Use 'text', 'json' or 'csv'"))?;
    let record = record_from_body(payload)?;

    let result = state.pipeline.evaluate(&record)?;
    let document = ReportDocument::build(&record, &result, &state.pipeline.config().presentation);
    let body = document.render(format)?;
    let file_name = document.suggested_file_name(format);

    info!(format = format.as_str(), file = %file_name, "Report generated");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, format.content_type())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        )
        .body(Body::from(body))
        .map_err(|e| AppError::internal(&e.to_string()))
}
