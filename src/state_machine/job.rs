use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::JobStatus;

/// The result of executing a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobOutcome {
    Success,
    Failure(String),
}

/// A single field change applied to a `JobRecord` by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobMutation {
    Start { at: DateTime<Utc> },
    Complete { at: DateTime<Utc> },
    Fail { at: DateTime<Utc>, reason: String },
}

impl JobMutation {
    /// Terminal mutation for an executor outcome.
    pub fn from_outcome(outcome: JobOutcome, at: DateTime<Utc>) -> Self {
        match outcome {
            JobOutcome::Success => JobMutation::Complete { at },
            JobOutcome::Failure(reason) => JobMutation::Fail { at, reason },
        }
    }

    pub fn target_status(&self) -> JobStatus {
        match self {
            JobMutation::Start { .. } => JobStatus::Processing,
            JobMutation::Complete { .. } => JobStatus::Completed,
            JobMutation::Fail { .. } => JobStatus::Failed,
        }
    }
}

/// One submitted job, as stored in the registry and returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub description: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobRecord {
    pub fn new(job_type: &str, description: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            job_type: job_type.to_string(),
            description: description.to_string(),
            status: JobStatus::Queued,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            error: None,
        }
    }
}
