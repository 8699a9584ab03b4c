//! In-memory job ledger shared by the submission path, the worker loop and
//! status queries.
//!
//! A single `RwLock` guards the record map and the insertion order, so
//! `list` and `count_by_status` always see one consistent snapshot.
//! `list` returns records in submission order.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::error::{Result, WorkerError};
use crate::state_machine::{JobMutation, JobRecord, JobStatus, StateMachine};

#[derive(Debug, Default)]
struct Ledger {
    records: HashMap<String, JobRecord>,
    order: Vec<String>,
}

/// Number of records per status, taken from one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub queued: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.queued + self.processing + self.completed + self.failed
    }

    fn bump(&mut self, status: JobStatus) {
        match status {
            JobStatus::Queued => self.queued += 1,
            JobStatus::Processing => self.processing += 1,
            JobStatus::Completed => self.completed += 1,
            JobStatus::Failed => self.failed += 1,
        }
    }
}

#[derive(Debug, Default)]
pub struct JobRegistry {
    inner: RwLock<Ledger>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Writers never panic while holding the lock, so a poisoned guard
    // still holds a consistent ledger.
    fn read(&self) -> RwLockReadGuard<'_, Ledger> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Ledger> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a new record. Fails if the id is already present.
    pub fn put(&self, record: JobRecord) -> Result<()> {
        let mut ledger = self.write();
        if ledger.records.contains_key(&record.id) {
            return Err(WorkerError::DuplicateId(record.id));
        }
        ledger.order.push(record.id.clone());
        ledger.records.insert(record.id.clone(), record);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<JobRecord> {
        self.read()
            .records
            .get(id)
            .cloned()
            .ok_or_else(|| WorkerError::JobNotFound(id.to_string()))
    }

    /// Atomically apply `mutation` to the record with `id` and return the
    /// updated record.
    pub fn update(&self, id: &str, mutation: JobMutation) -> Result<JobRecord> {
        let mut ledger = self.write();
        let record = ledger
            .records
            .get_mut(id)
            .ok_or_else(|| WorkerError::JobNotFound(id.to_string()))?;
        StateMachine::apply(record, mutation)?;
        Ok(record.clone())
    }

    /// Snapshot of every record in submission order.
    pub fn list(&self) -> Vec<JobRecord> {
        let ledger = self.read();
        ledger
            .order
            .iter()
            .filter_map(|id| ledger.records.get(id).cloned())
            .collect()
    }

    pub fn count_by_status(&self) -> StatusCounts {
        let ledger = self.read();
        let mut counts = StatusCounts::default();
        for record in ledger.records.values() {
            counts.bump(record.status);
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
