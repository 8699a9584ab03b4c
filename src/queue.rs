//! Unbounded FIFO of pending jobs with event-driven wake-up.
//!
//! `enqueue` never blocks. `dequeue` parks the consumer on a `Notify`
//! until an entry arrives; a permit stored by `notify_one` covers the case
//! where the entry lands before the consumer starts waiting.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

/// A pending unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub job_id: String,
    pub job_type: String,
}

impl QueueEntry {
    pub fn new(job_id: impl Into<String>, job_type: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            job_type: job_type.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct WorkQueue {
    entries: Mutex<VecDeque<QueueEntry>>,
    available: Notify,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, VecDeque<QueueEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append to the tail and wake the consumer.
    pub fn enqueue(&self, entry: QueueEntry) {
        self.entries().push_back(entry);
        self.available.notify_one();
    }

    /// Wait for the next entry in FIFO order.
    ///
    /// Each entry is handed to exactly one caller.
    pub async fn dequeue(&self) -> QueueEntry {
        loop {
            if let Some(entry) = self.try_dequeue() {
                return entry;
            }
            self.available.notified().await;
        }
    }

    pub fn try_dequeue(&self) -> Option<QueueEntry> {
        self.entries().pop_front()
    }

    /// Pending entries. For observability only.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn fifo_order() {
        let queue = WorkQueue::new();
        queue.enqueue(QueueEntry::new("1", "email"));
        queue.enqueue(QueueEntry::new("2", "image"));
        queue.enqueue(QueueEntry::new("3", "report"));
        assert_eq!(queue.len(), 3);

        let ids: Vec<String> = std::iter::from_fn(|| queue.try_dequeue())
            .map(|e| e.job_id)
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn try_dequeue_on_empty_returns_none() {
        let queue = WorkQueue::new();
        assert!(queue.try_dequeue().is_none());
    }

    #[tokio::test]
    async fn dequeue_returns_already_queued_entry() {
        let queue = WorkQueue::new();
        queue.enqueue(QueueEntry::new("a", "email"));
        let entry = tokio::time::timeout(Duration::from_secs(1), queue.dequeue())
            .await
            .expect("dequeue should not block");
        assert_eq!(entry.job_id, "a");
    }

    #[tokio::test]
    async fn dequeue_waits_for_enqueue() {
        let queue = Arc::new(WorkQueue::new());
        let consumer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.dequeue().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!consumer.is_finished());

        queue.enqueue(QueueEntry::new("late", "data_sync"));
        let entry = tokio::time::timeout(Duration::from_secs(1), consumer)
            .await
            .expect("consumer should wake")
            .unwrap();
        assert_eq!(entry, QueueEntry::new("late", "data_sync"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_producers_deliver_every_entry_once() {
        let queue = Arc::new(WorkQueue::new());
        let producers: Vec<_> = (0..4)
            .map(|p| {
                let queue = Arc::clone(&queue);
                tokio::spawn(async move {
                    for i in 0..25 {
                        queue.enqueue(QueueEntry::new(format!("{p}-{i}"), "email"));
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.await.unwrap();
        }

        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            let entry = queue.dequeue().await;
            assert!(seen.insert(entry.job_id));
        }
        assert!(queue.is_empty());
    }
}
