use thiserror::Error;

use crate::state_machine::JobStatus;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Invalid job type '{given}'. Valid types: [{}]", .valid.join(", "))]
    InvalidJobType { given: String, valid: Vec<String> },

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Duplicate job id: {0}")]
    DuplicateId(String),

    #[error("Job {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: JobStatus,
        to: JobStatus,
    },
}

pub type Result<T> = std::result::Result<T, WorkerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_job_type_lists_valid_types() {
        let err = WorkerError::InvalidJobType {
            given: "bogus".into(),
            valid: vec!["email".into(), "image".into()],
        };
        assert_eq!(
            err.to_string(),
            "Invalid job type 'bogus'. Valid types: [email, image]"
        );
    }

    #[test]
    fn invalid_transition_display() {
        let err = WorkerError::InvalidTransition {
            id: "abc".into(),
            from: JobStatus::Completed,
            to: JobStatus::Processing,
        };
        assert_eq!(err.to_string(), "Job abc cannot move from completed to processing");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WorkerError>();
    }
}
