//! HTTP Surface
//!
//! axum router exposing lesson generation to the dashboard:
//! `POST /api/generate-lessons` and `GET /health`.

use crate::config::{GenerationConfig, ServerConfig};
use crate::error::ApiError;
use crate::orchestrator::LessonOrchestrator;
use crate::types::GenerationRequest;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

/// Header naming the backend/variant (or `fallback`) that produced the plan.
pub const LESSON_SOURCE_HEADER: &str = "x-lesson-source";

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<LessonOrchestrator>,
    pub generation: GenerationConfig,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    details: Vec<String>,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
            details: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message: err.to_string(),
            details: err.details(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    details: &'a [String],
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: &self.message,
            details: &self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateLessonsBody {
    text: Option<String>,
    total_lessons: Option<i64>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    backends: Vec<String>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate-lessons", post(generate_lessons))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(server: &ServerConfig, state: AppState) -> Result<(), ApiError> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind((server.bind.as_str(), server.port)).await?;
    info!(addr = %listener.local_addr()?, "lessonplan listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("lessonplan shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Turn a raw request body into a validated generation request.
fn parse_generate_body(body: &[u8], generation: &GenerationConfig) -> Result<GenerationRequest, AppError> {
    let parsed: GenerateLessonsBody = serde_json::from_slice(body)
        .map_err(|e| AppError::bad_request(format!("Invalid JSON body: {}", e)))?;

    let text = parsed
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("Missing text content"))?;

    let count = parsed
        .total_lessons
        .unwrap_or(generation.default_lessons as i64);
    if count < 1 {
        return Err(AppError::bad_request("totalLessons must be at least 1"));
    }
    if count as u64 > generation.max_lessons as u64 {
        return Err(AppError::bad_request(format!(
            "totalLessons must not exceed {}",
            generation.max_lessons
        )));
    }

    Ok(GenerationRequest::new(text, count as usize)?)
}

async fn generate_lessons(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let request = parse_generate_body(&body, &state.generation).inspect_err(|e| {
        warn!(error = %e.message, "Rejected lesson request");
    })?;

    let outcome = state.orchestrator.generate(&request).await.inspect_err(|e| {
        error!(error = %e, "Lesson generation failed");
    })?;

    let source = HeaderValue::try_from(outcome.source.to_string()).map_err(|e| AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: format!("Invalid lesson source header: {}", e),
        details: Vec::new(),
    })?;

    Ok((
        [(HeaderName::from_static(LESSON_SOURCE_HEADER), source)],
        Json(outcome.lessons),
    )
        .into_response())
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        backends: state.orchestrator.available_backend_names(),
    })
}
