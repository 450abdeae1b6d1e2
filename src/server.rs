//! HTTP transport: routing, payload validation and CORS
//!
//! Routes:
//! - `GET /` liveness check
//! - `POST /pipelines/parse` pipeline analysis
//!
//! Handlers share one immutable [`ServerConfig`] behind an `Arc`.

use std::future::Future;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::analysis::analyze;
use crate::config::ServerConfig;
use crate::error::{PipeError, Result};
use crate::pipeline::{AnalysisReport, Pipeline};

#[derive(Clone)]
struct AppState {
    config: Arc<ServerConfig>,
}

/// Error returned to HTTP callers as `{"detail": ..., "code": ...}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: PipeError,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<PipeError> for ApiError {
    fn from(error: PipeError) -> Self {
        let status = match &error {
            PipeError::InvalidPayload { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            PipeError::TooManyNodes { .. } | PipeError::TooManyEdges { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self { status, error }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Keep the extractor's status: 400 bad syntax, 413 too large,
        // 415 wrong content type, 422 missing or mistyped fields.
        Self {
            status: rejection.status(),
            error: PipeError::InvalidPayload {
                details: rejection.body_text(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.error.is_client_error() {
            warn!(status = %self.status, error = %self.error, "rejected pipeline");
        } else {
            error!(status = %self.status, error = %self.error, "request failed");
        }

        let body = json!({
            "detail": self.error.to_string(),
            "code": self.error.code(),
        });
        (self.status, Json(body)).into_response()
    }
}

/// Build the CORS policy: one exact origin, any method and header, credentials allowed
pub fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin).map_err(|e| PipeError::InvalidOrigin {
        origin: origin.to_string(),
        reason: e.to_string(),
    })?;

    // Wildcards are refused alongside credentials, so methods and headers
    // mirror whatever the preflight asks for. A list (not an exact value)
    // keeps the allow-origin header off responses to other origins.
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// Build the application router
pub fn router(config: Arc<ServerConfig>) -> Result<Router> {
    let cors = cors_layer(&config.server.allowed_origin)?;
    let body_limit = config.limits.max_body_bytes;

    Ok(Router::new()
        .route("/", get(ping))
        .route("/pipelines/parse", post(parse_pipeline))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { config }))
}

/// Serve on the configured address until Ctrl-C
pub async fn serve(config: ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(config.server.bind).await?;
    serve_on(listener, Arc::new(config), shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve_on<F>(listener: TcpListener, config: Arc<ServerConfig>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(Arc::clone(&config))?;

    info!(
        addr = %listener.local_addr()?,
        allowed_origin = %config.server.allowed_origin,
        max_nodes = config.limits.max_nodes,
        max_edges = config.limits.max_edges,
        "pipeparse listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("pipeparse stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C, shutting down");
    }
}

async fn ping() -> Json<Value> {
    Json(json!({ "Ping": "Pong" }))
}

async fn parse_pipeline(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Pipeline>, JsonRejection>,
) -> std::result::Result<Json<AnalysisReport>, ApiError> {
    let Json(pipeline) = payload?;
    let report = analyze(&pipeline, state.config.limits())?;

    info!(
        num_nodes = report.num_nodes,
        num_edges = report.num_edges,
        is_dag = report.is_dag,
        "pipeline parsed"
    );

    Ok(Json(report))
}
