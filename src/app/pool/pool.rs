//! Task pool management and coordination
//!
//! This module provides the [`TaskPool`] that owns a fixed set of workers,
//! accepts tasks without blocking the submitter, and drains outstanding
//! work on shutdown.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::config::{ConfigPresets, TaskPoolConfig};
use super::core::TaskWorker;
use super::types::{PoolCounters, Task, TaskPoolStats};
use crate::errors::{PoolError, PoolResult};

/// Fixed-size pool of task workers
///
/// Must be created inside a tokio runtime. Tasks submitted to a pool with
/// more than one worker may run in any order; a single-worker pool runs them
/// one at a time in submission order.
#[derive(Debug)]
pub struct TaskPool {
    /// Pool name used in logs and errors
    name: String,
    /// Pool configuration
    config: TaskPoolConfig,
    /// Submission side of the task channel; `None` once shut down
    sender: Mutex<Option<mpsc::UnboundedSender<Task>>>,
    /// Worker task handles
    worker_handles: Mutex<Vec<JoinHandle<()>>>,
    /// Outcome counters shared with workers
    counters: Arc<PoolCounters>,
}

impl TaskPool {
    /// Create a pool and start its workers
    pub fn new(name: impl Into<String>, config: TaskPoolConfig) -> Self {
        let name = name.into();
        let worker_count = config.worker_count.max(1);
        let (sender, receiver) = mpsc::unbounded_channel();
        let receiver = Arc::new(tokio::sync::Mutex::new(receiver));
        let counters = Arc::new(PoolCounters::default());

        let worker_handles = (0..worker_count)
            .map(|worker_id| {
                let worker = TaskWorker::new(
                    worker_id as u32,
                    name.clone(),
                    receiver.clone(),
                    counters.clone(),
                );
                tokio::spawn(worker.run())
            })
            .collect();

        info!("Task pool '{}' started with {} workers", name, worker_count);

        Self {
            name,
            config,
            sender: Mutex::new(Some(sender)),
            worker_handles: Mutex::new(worker_handles),
            counters,
        }
    }

    /// Create a single-worker pool that preserves submission order
    pub fn sequential(name: impl Into<String>) -> Self {
        Self::new(name, ConfigPresets::sequential())
    }

    /// Enqueue an async task; returns immediately
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Closed` after [`shutdown`](Self::shutdown)
    pub fn submit<F>(&self, task: F) -> PoolResult<()>
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let sender = self.sender.lock();
        let Some(sender) = sender.as_ref() else {
            return Err(self.closed());
        };

        // Counted before the send so a fast worker never finishes a task
        // that was not yet recorded as submitted.
        self.counters.record_submitted();
        if sender.send(Box::pin(task)).is_err() {
            self.counters.retract_submitted();
            warn!("Task pool '{}' has no live workers", self.name);
            return Err(self.closed());
        }

        debug!("Task submitted to pool '{}'", self.name);
        Ok(())
    }

    /// Enqueue a synchronous closure, run on tokio's blocking threads
    pub fn submit_blocking<F>(&self, task: F) -> PoolResult<()>
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        self.submit(async move {
            match tokio::task::spawn_blocking(task).await {
                Ok(result) => result,
                // Re-raise so the worker records it as a panic
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => Err(anyhow::anyhow!("blocking task cancelled: {}", e)),
            }
        })
    }

    /// Stop accepting tasks and wait for queued tasks to finish
    ///
    /// Idempotent; a second call returns immediately.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::ShutdownTimeout` if workers do not drain in time
    pub async fn shutdown(&self, timeout: Duration) -> PoolResult<()> {
        let sender = self.sender.lock().take();
        if sender.is_none() {
            return Ok(());
        }
        drop(sender);

        info!("Shutting down task pool '{}'", self.name);
        let handles: Vec<JoinHandle<()>> = std::mem::take(&mut *self.worker_handles.lock());

        let drained = tokio::time::timeout(timeout, futures::future::join_all(handles)).await;
        match drained {
            Ok(results) => {
                let aborted = results.iter().filter(|r| r.is_err()).count();
                if aborted > 0 {
                    warn!(
                        "{} workers of pool '{}' ended abnormally",
                        aborted, self.name
                    );
                }
                let stats = self.stats();
                info!(
                    "Task pool '{}' shut down: {} completed, {} failed, {} panicked",
                    self.name, stats.completed, stats.failed, stats.panicked
                );
                Ok(())
            }
            Err(_) => {
                warn!(
                    "Task pool '{}' did not drain within {:?}",
                    self.name, timeout
                );
                Err(PoolError::ShutdownTimeout {
                    pool: self.name.clone(),
                    seconds: timeout.as_secs(),
                })
            }
        }
    }

    /// Current task statistics
    pub fn stats(&self) -> TaskPoolStats {
        self.counters.snapshot()
    }

    /// Pool name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pool configuration
    pub fn config(&self) -> &TaskPoolConfig {
        &self.config
    }

    /// Number of workers
    pub fn worker_count(&self) -> usize {
        self.config.worker_count.max(1)
    }

    /// Whether the pool still accepts tasks
    pub fn is_open(&self) -> bool {
        self.sender.lock().is_some()
    }

    fn closed(&self) -> PoolError {
        PoolError::Closed {
            pool: self.name.clone(),
        }
    }
}
