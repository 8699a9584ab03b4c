//! Job service: owns the registry and work queue and starts the worker.
//!
//! [`JobService::start`] builds fresh instances and spawns the worker loop;
//! the returned [`WorkerHandle`] stops it. Clones of `JobService` share the
//! same registry and queue, so one can be handed to the HTTP layer while the
//! handle stays with the caller that owns the process lifecycle.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::catalog::JobCatalog;
use crate::config::WorkerConfig;
use crate::error::Result;
use crate::executor::{Executor, SimulatedExecutor};
use crate::queue::{QueueEntry, WorkQueue};
use crate::registry::JobRegistry;
use crate::state_machine::{JobRecord, JobStatus};
use crate::types::{HealthResponse, JobListResponse, StatsResponse, SubmitJobResponse};
use crate::worker::Worker;

#[derive(Clone)]
pub struct JobService {
    registry: Arc<JobRegistry>,
    queue: Arc<WorkQueue>,
    service_name: String,
}

/// Controls the lifetime of the worker loop.
pub struct WorkerHandle {
    shutdown: CancellationToken,
    drain: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    /// Stop the worker and wait for it to exit.
    ///
    /// A job already running finishes first. With `drain`, every job still
    /// queued is executed too; otherwise those jobs stay `queued`.
    pub async fn shutdown(self, drain: bool) {
        self.shutdown_unless(drain, std::future::pending()).await;
    }

    /// Like [`shutdown`](Self::shutdown), but gives up waiting once
    /// `interrupt` resolves and aborts the worker task.
    ///
    /// Returns `true` when the worker exited on its own.
    pub async fn shutdown_unless<F>(mut self, drain: bool, interrupt: F) -> bool
    where
        F: Future<Output = ()>,
    {
        self.drain.store(drain, Ordering::SeqCst);
        self.shutdown.cancel();

        tokio::select! {
            joined = &mut self.task => {
                if let Err(e) = joined {
                    tracing::error!(error = %e, "Worker task ended abnormally");
                }
                true
            }
            () = interrupt => {
                self.task.abort();
                tracing::warn!(
                    drain,
                    "Worker shutdown interrupted, remaining jobs left queued"
                );
                false
            }
        }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl JobService {
    /// Create the service with the simulated executor and start its worker.
    pub fn start(config: &WorkerConfig) -> (Self, WorkerHandle) {
        Self::start_with_executor(config, SimulatedExecutor::new(config.time_unit()))
    }

    pub fn start_with_executor<E: Executor>(
        config: &WorkerConfig,
        executor: E,
    ) -> (Self, WorkerHandle) {
        let service = Self {
            registry: Arc::new(JobRegistry::new()),
            queue: Arc::new(WorkQueue::new()),
            service_name: config.service_name.clone(),
        };

        let worker = Worker::new(
            Arc::clone(&service.registry),
            Arc::clone(&service.queue),
            Arc::new(executor),
        );
        let shutdown = CancellationToken::new();
        let drain = Arc::new(AtomicBool::new(false));
        let task = tokio::spawn(worker.run(shutdown.clone(), Arc::clone(&drain)));

        let handle = WorkerHandle {
            shutdown,
            drain,
            task,
        };
        (service, handle)
    }

    /// Validate `job_type`, record the job and queue it for the worker.
    pub fn submit(&self, job_type: &str) -> Result<SubmitJobResponse> {
        let spec = JobCatalog::validate(job_type)?;

        let record = JobRecord::new(spec.name, spec.description);
        let entry = QueueEntry::new(record.id.clone(), spec.name);
        self.registry.put(record)?;
        self.queue.enqueue(entry.clone());

        tracing::info!(job_id = %entry.job_id, job_type = %entry.job_type, "Created job");

        Ok(SubmitJobResponse {
            job_id: entry.job_id,
            job_type: entry.job_type,
            status: JobStatus::Queued,
            message: "Job created and queued for processing".to_string(),
        })
    }

    pub fn get_status(&self, job_id: &str) -> Result<JobRecord> {
        self.registry.get(job_id)
    }

    pub fn list_all(&self) -> JobListResponse {
        let jobs = self.registry.list();
        JobListResponse {
            total: jobs.len(),
            queue_size: self.queue.len(),
            jobs,
        }
    }

    pub fn stats(&self) -> StatsResponse {
        let counts = self.registry.count_by_status();
        StatsResponse {
            total_jobs: counts.total(),
            completed: counts.completed,
            processing: counts.processing,
            queued: counts.queued,
            failed: counts.failed,
            queue_size: self.queue.len(),
            available_job_types: JobCatalog::names(),
        }
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "healthy".to_string(),
            service: self.service_name.clone(),
            timestamp: Utc::now(),
            queue_size: self.queue.len(),
            total_jobs: self.registry.len(),
        }
    }
}
