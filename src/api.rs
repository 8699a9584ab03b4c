//! HTTP surface over [`JobService`].
//!
//! | method | path            | handler                |
//! |--------|-----------------|------------------------|
//! | GET    | `/health`       | service health         |
//! | POST   | `/jobs`         | submit a job (201)     |
//! | GET    | `/jobs`         | list every job         |
//! | GET    | `/jobs/:job_id` | status of one job      |
//! | GET    | `/stats`        | counts by status       |

use std::net::SocketAddr;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::WorkerError;
use crate::service::JobService;
use crate::state_machine::JobRecord;
use crate::types::{ErrorResponse, HealthResponse, JobListResponse, StatsResponse, SubmitJobResponse};

#[derive(Debug, Deserialize)]
struct SubmitJobRequest {
    /// `None` only when the key is absent; an explicit `null` is kept.
    #[serde(rename = "type", default, deserialize_with = "present")]
    job_type: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl SubmitJobRequest {
    /// The requested type as text. Non-string values keep their JSON form so
    /// they fail catalog validation like any other unknown name.
    fn job_type_name(&self) -> Option<String> {
        self.job_type.as_ref().map(|value| match value {
            Value::String(name) => name.clone(),
            other => other.to_string(),
        })
    }
}

/// Errors returned by the handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    MissingJobType,
    Worker(WorkerError),
}

impl From<WorkerError> for ApiError {
    fn from(err: WorkerError) -> Self {
        ApiError::Worker(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MissingJobType => (StatusCode::BAD_REQUEST, "Job type required".to_string()),
            ApiError::Worker(WorkerError::InvalidJobType { valid, .. }) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid job type. Valid types: [{}]", valid.join(", ")),
            ),
            ApiError::Worker(WorkerError::JobNotFound(_)) => {
                (StatusCode::NOT_FOUND, "Job not found".to_string())
            }
            ApiError::Worker(other) => {
                tracing::error!(error = %other, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

pub fn router(service: JobService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/jobs", get(list_jobs_handler).post(submit_job_handler))
        .route("/jobs/:job_id", get(job_status_handler))
        .route("/stats", get(stats_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(service)
}

/// Bind `addr` and serve until `shutdown` is cancelled.
pub async fn serve(
    addr: SocketAddr,
    service: JobService,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(addr = %addr, "Worker service listening");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("HTTP server failed")?;

    Ok(())
}

async fn health_handler(State(service): State<JobService>) -> Json<HealthResponse> {
    Json(service.health())
}

async fn submit_job_handler(
    State(service): State<JobService>,
    payload: Result<Json<SubmitJobRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitJobResponse>), ApiError> {
    let job_type = match payload {
        Ok(Json(request)) => request
            .job_type_name()
            .ok_or(ApiError::MissingJobType)?,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected job submission body");
            return Err(ApiError::MissingJobType);
        }
    };

    let created = service.submit(&job_type)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn job_status_handler(
    State(service): State<JobService>,
    Path(job_id): Path<String>,
) -> Result<Json<JobRecord>, ApiError> {
    Ok(Json(service.get_status(&job_id)?))
}

async fn list_jobs_handler(State(service): State<JobService>) -> Json<JobListResponse> {
    Json(service.list_all())
}

async fn stats_handler(State(service): State<JobService>) -> Json<StatsResponse> {
    Json(service.stats())
}
