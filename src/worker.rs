//! The background consumer that drains the work queue.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::executor::Executor;
use crate::queue::{QueueEntry, WorkQueue};
use crate::registry::JobRegistry;
use crate::state_machine::{JobMutation, JobOutcome, JobRecord};

/// Drives queued jobs through the executor, one at a time.
pub struct Worker<E> {
    registry: Arc<JobRegistry>,
    queue: Arc<WorkQueue>,
    executor: Arc<E>,
}

impl<E: Executor> Worker<E> {
    pub fn new(registry: Arc<JobRegistry>, queue: Arc<WorkQueue>, executor: Arc<E>) -> Self {
        Self {
            registry,
            queue,
            executor,
        }
    }

    /// Run until `shutdown` is cancelled.
    ///
    /// Shutdown is only observed between jobs. When `drain` is set at that
    /// point, every entry still queued is executed before returning.
    pub async fn run(self, shutdown: CancellationToken, drain: Arc<AtomicBool>) {
        tracing::info!("Worker started");

        loop {
            let entry = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                entry = self.queue.dequeue() => entry,
            };
            self.handle(entry).await;
        }

        if drain.load(Ordering::SeqCst) {
            let mut drained = 0usize;
            while let Some(entry) = self.queue.try_dequeue() {
                self.handle(entry).await;
                drained += 1;
            }
            tracing::info!(drained, "Drained work queue");
        }

        tracing::info!(pending = self.queue.len(), "Worker stopped");
    }

    async fn handle(&self, entry: QueueEntry) {
        if let Err(e) = self.process(entry).await {
            tracing::error!(error = %e, "Worker could not update job record");
        }
    }

    /// Execute one dequeued entry and record its terminal status.
    pub async fn process(&self, entry: QueueEntry) -> Result<JobRecord> {
        let QueueEntry { job_id, job_type } = entry;

        self.registry
            .update(&job_id, JobMutation::Start { at: Utc::now() })?;
        tracing::info!(job_id = %job_id, job_type = %job_type, "Starting job");

        let outcome = self.run_isolated(job_type).await;
        match &outcome {
            JobOutcome::Success => tracing::info!(job_id = %job_id, "Completed job"),
            JobOutcome::Failure(reason) => {
                tracing::error!(job_id = %job_id, error = %reason, "Job failed")
            }
        }

        self.registry
            .update(&job_id, JobMutation::from_outcome(outcome, Utc::now()))
    }

    // A panicking executor takes down its own task, not the worker.
    async fn run_isolated(&self, job_type: String) -> JobOutcome {
        let executor = Arc::clone(&self.executor);
        let task = tokio::spawn(async move { executor.execute(&job_type).await });
        match task.await {
            Ok(outcome) => outcome,
            Err(e) => JobOutcome::Failure(failure_reason(e)),
        }
    }
}

fn failure_reason(err: JoinError) -> String {
    if err.is_cancelled() {
        return "execution was cancelled".to_string();
    }
    match err.try_into_panic() {
        Ok(payload) => panic_message(payload.as_ref()),
        Err(e) => e.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "executor panicked".to_string()
    }
}
