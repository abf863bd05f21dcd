//! Wealthy Ways Web Server
//!
//! Axum-based REST API exposing the evaluation pipeline.
//!
//! - `GET  /health`        liveness probe
//! - `GET  /api/schema`    active feature schema and scoring scale
//! - `GET  /api/models`    loaded model bundle and fingerprint
//! - `POST /api/assess`    evaluate one financial record
//! - `POST /api/report`    evaluate and download the summary document
//!
//! The model bundle is loaded once before the server starts and shared
//! read-only by every request.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use wealthy_core::Pipeline;

mod handlers;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

/// Create the application router
pub fn create_router(pipeline: Arc<Pipeline>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState { pipeline });

    let api_routes = Router::new()
        .route("/schema", get(handlers::get_schema))
        .route("/models", get(handlers::get_models))
        .route("/assess", post(handlers::assess))
        .route("/report", post(handlers::download_report));

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

/// Start the server
pub async fn serve(
    pipeline: Arc<Pipeline>,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if host != "127.0.0.1" && host != "localhost" {
        warn!("⚠️  Binding to {} - the API has no authentication", host);
    }

    info!(
        "Model bundle {} ({}, {} normalizer)",
        pipeline.bundle().short_fingerprint(),
        pipeline.bundle().schema().version,
        pipeline.bundle().normalizer().name()
    );

    let app = create_router(pipeline, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Request failed");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<wealthy_core::Error> for AppError {
    fn from(err: wealthy_core::Error) -> Self {
        match err {
            // Validation messages are safe to echo back
            wealthy_core::Error::InvalidInput(msg) => Self::bad_request(&msg),
            err @ wealthy_core::Error::ModelUnavailable { .. } => Self {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: "Prediction model unavailable".to_string(),
                internal: Some(err.into()),
            },
            err => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                // Return generic message to client
                message: "An internal error occurred".to_string(),
                // Keep full error for logging
                internal: Some(err.into()),
            },
        }
    }
}
