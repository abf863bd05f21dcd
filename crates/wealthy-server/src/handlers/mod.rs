//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod assess;
pub mod report;
pub mod schema;

// Re-export all handlers for use in router
pub use assess::*;
pub use report::*;
pub use schema::*;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use wealthy_core::UserFinancialRecord;

use crate::AppError;

/// Unwrap a JSON record body, turning extractor failures into a 400
pub(crate) fn record_from_body(
    payload: Result<Json<UserFinancialRecord>, JsonRejection>,
) -> Result<UserFinancialRecord, AppError> {
    match payload {
        Ok(Json(record)) => Ok(record),
        Err(rejection) => Err(AppError::bad_request(&format!(
            "Invalid record: {}",
            rejection.body_text()
        ))),
    }
}
