//! Tipos de dados para as respostas da API HTTP do worker-service.
//!
//! Todas as structs derivam `Serialize` e `Deserialize` para que o servidor e o
//! [`WorkerClient`](crate::client::WorkerClient) usem o mesmo formato JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state_machine::{JobRecord, JobStatus};

/// Corpo de um `POST /jobs` bem-sucedido.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitJobResponse {
    pub job_id: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub status: JobStatus,
    pub message: String,
}

/// Corpo de `GET /jobs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListResponse {
    pub total: usize,
    pub queue_size: usize,
    pub jobs: Vec<JobRecord>,
}

/// Corpo de `GET /stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_jobs: usize,
    pub completed: usize,
    pub processing: usize,
    pub queued: usize,
    pub failed: usize,
    pub queue_size: usize,
    pub available_job_types: Vec<String>,
}

/// Corpo de `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: DateTime<Utc>,
    pub queue_size: usize,
    pub total_jobs: usize,
}

/// Corpo de erro usado por toda resposta não-2xx.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
