use std::fmt;

use serde::{Deserialize, Serialize};

use super::job::{JobMutation, JobRecord};
use crate::error::{Result, WorkerError};

/// Lifecycle status of a job.
///
/// Each job flows through: queued → processing → completed | failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Position along the lifecycle. Terminal states share the last rank.
    pub fn rank(self) -> u8 {
        match self {
            JobStatus::Queued => 0,
            JobStatus::Processing => 1,
            JobStatus::Completed | JobStatus::Failed => 2,
        }
    }

    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Queued, JobStatus::Processing)
                | (JobStatus::Processing, JobStatus::Completed)
                | (JobStatus::Processing, JobStatus::Failed)
        )
    }
}

/// Applies mutations to a `JobRecord`, enforcing forward-only transitions.
pub struct StateMachine;

impl StateMachine {
    /// Apply `mutation` to `job` and return the new status.
    ///
    /// - `Start` moves `queued → processing` and stamps `started_at`.
    /// - `Complete` moves `processing → completed` and stamps `completed_at`.
    /// - `Fail` moves `processing → failed`, stamps `completed_at` and
    ///   records the reason in `error`.
    ///
    /// Any other combination is rejected and the record is left untouched.
    pub fn apply(job: &mut JobRecord, mutation: JobMutation) -> Result<JobStatus> {
        let target = mutation.target_status();
        if !job.status.can_transition_to(target) {
            return Err(WorkerError::InvalidTransition {
                id: job.id.clone(),
                from: job.status,
                to: target,
            });
        }

        match mutation {
            JobMutation::Start { at } => {
                job.started_at = Some(at);
            }
            JobMutation::Complete { at } => {
                job.completed_at = Some(at);
            }
            JobMutation::Fail { at, reason } => {
                job.completed_at = Some(at);
                job.error = Some(reason);
            }
        }
        job.status = target;

        Ok(target)
    }
}
