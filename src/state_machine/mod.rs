mod job;
mod state;

pub use job::{JobMutation, JobOutcome, JobRecord};
pub use state::{JobStatus, StateMachine};
