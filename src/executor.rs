use std::future::Future;
use std::time::Duration;

use crate::catalog::JobCatalog;
use crate::state_machine::JobOutcome;

/// Performs the work behind a job.
///
/// The worker runs each call on its own task; a panic inside `execute` is
/// reported as a failure of that job only.
pub trait Executor: Send + Sync + 'static {
    fn execute(&self, job_type: &str) -> impl Future<Output = JobOutcome> + Send;
}

/// Stand-in executor that sleeps for the catalog duration of the job type.
#[derive(Debug, Clone)]
pub struct SimulatedExecutor {
    time_unit: Duration,
}

impl SimulatedExecutor {
    pub fn new(time_unit: Duration) -> Self {
        Self { time_unit }
    }

    /// Wall-clock delay for `job_type`. Unknown types use the default duration.
    /// Saturates at `Duration::MAX`.
    pub fn duration_for(&self, job_type: &str) -> Duration {
        self.time_unit
            .checked_mul(JobCatalog::duration_units(job_type))
            .unwrap_or(Duration::MAX)
    }
}

impl Executor for SimulatedExecutor {
    async fn execute(&self, job_type: &str) -> JobOutcome {
        tokio::time::sleep(self.duration_for(job_type)).await;
        JobOutcome::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DEFAULT_DURATION_UNITS;
    use std::time::Instant;

    #[test]
    fn durations_scale_with_time_unit() {
        let executor = SimulatedExecutor::new(Duration::from_millis(10));
        assert_eq!(executor.duration_for("email"), Duration::from_millis(20));
        assert_eq!(executor.duration_for("image"), Duration::from_millis(50));
        assert_eq!(executor.duration_for("data_sync"), Duration::from_millis(30));
        assert_eq!(executor.duration_for("report"), Duration::from_millis(40));
    }

    #[test]
    fn unknown_type_uses_default_duration() {
        let executor = SimulatedExecutor::new(Duration::from_millis(10));
        assert_eq!(
            executor.duration_for("fax"),
            Duration::from_millis(10 * u64::from(DEFAULT_DURATION_UNITS))
        );
    }

    #[test]
    fn huge_time_unit_saturates() {
        let executor = SimulatedExecutor::new(Duration::MAX);
        assert_eq!(executor.duration_for("image"), Duration::MAX);

        let executor = SimulatedExecutor::new(Duration::from_secs(u64::MAX / 4));
        assert_eq!(executor.duration_for("image"), Duration::MAX);
    }

    #[tokio::test]
    async fn execute_waits_then_succeeds() {
        let executor = SimulatedExecutor::new(Duration::from_millis(5));
        let start = Instant::now();
        let outcome = executor.execute("email").await;
        assert_eq!(outcome, JobOutcome::Success);
        assert!(start.elapsed() >= Duration::from_millis(10));
    }

    #[tokio::test]
    async fn unknown_type_still_succeeds() {
        let executor = SimulatedExecutor::new(Duration::from_millis(1));
        assert_eq!(executor.execute("not-a-type").await, JobOutcome::Success);
    }
}
