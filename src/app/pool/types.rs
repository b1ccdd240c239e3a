//! Task pool type definitions
//!
//! Task representation, per-task outcomes, and the counters a pool keeps
//! for its workers.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// A unit of work accepted by a [`TaskPool`](super::TaskPool)
pub type Task = BoxFuture<'static, anyhow::Result<()>>;

/// How a single task ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The task returned `Ok`
    Completed,
    /// The task returned an error
    Failed(String),
    /// The task panicked
    Panicked(String),
}

impl TaskOutcome {
    /// Whether the task finished without error
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Completed)
    }
}

/// Point-in-time statistics for a task pool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPoolStats {
    /// Tasks accepted by `submit`
    pub submitted: u64,
    /// Tasks that returned `Ok`
    pub completed: u64,
    /// Tasks that returned an error
    pub failed: u64,
    /// Tasks that panicked
    pub panicked: u64,
}

impl TaskPoolStats {
    /// Tasks that have run to an outcome
    pub fn finished(&self) -> u64 {
        self.completed + self.failed + self.panicked
    }

    /// Tasks accepted but not yet finished
    pub fn pending(&self) -> u64 {
        self.submitted.saturating_sub(self.finished())
    }
}

/// Shared counters updated by submitters and workers
#[derive(Debug, Default)]
pub(crate) struct PoolCounters {
    submitted: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    panicked: AtomicU64,
}

impl PoolCounters {
    pub(crate) fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Undo a `record_submitted` for a task that never reached a worker
    pub(crate) fn retract_submitted(&self) {
        self.submitted.fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn record_outcome(&self, outcome: &TaskOutcome) {
        let counter = match outcome {
            TaskOutcome::Completed => &self.completed,
            TaskOutcome::Failed(_) => &self.failed,
            TaskOutcome::Panicked(_) => &self.panicked,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> TaskPoolStats {
        TaskPoolStats {
            submitted: self.submitted.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
        }
    }
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_pending_and_finished() {
        let stats = TaskPoolStats {
            submitted: 10,
            completed: 5,
            failed: 2,
            panicked: 1,
        };
        assert_eq!(stats.finished(), 8);
        assert_eq!(stats.pending(), 2);
    }

    #[test]
    fn test_counters_record_outcomes() {
        let counters = PoolCounters::default();
        counters.record_submitted();
        counters.record_submitted();
        counters.record_submitted();
        counters.retract_submitted();
        counters.record_outcome(&TaskOutcome::Completed);
        counters.record_outcome(&TaskOutcome::Panicked("boom".to_string()));

        let stats = counters.snapshot();
        assert_eq!(stats.submitted, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.panicked, 1);
        assert_eq!(stats.pending(), 0);
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(payload.as_ref()), "static message");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(payload.as_ref()), "owned message");

        let payload: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
