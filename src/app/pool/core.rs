//! Individual task worker
//!
//! Each worker loops pulling the next task from the pool's shared receiver
//! and runs it to completion. Errors and panics are contained here so that a
//! failing task never takes its worker down with it.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, warn};

use super::types::{panic_message, PoolCounters, Task, TaskOutcome};

/// Receiver shared by every worker of one pool
pub(crate) type SharedReceiver = Arc<Mutex<mpsc::UnboundedReceiver<Task>>>;

/// A single long-lived pool worker
pub(crate) struct TaskWorker {
    id: u32,
    pool: String,
    receiver: SharedReceiver,
    counters: Arc<PoolCounters>,
}

impl TaskWorker {
    pub(crate) fn new(
        id: u32,
        pool: impl Into<String>,
        receiver: SharedReceiver,
        counters: Arc<PoolCounters>,
    ) -> Self {
        Self {
            id,
            pool: pool.into(),
            receiver,
            counters,
        }
    }

    /// Run until the submission channel is closed and drained
    pub(crate) async fn run(self) {
        debug!("Worker {}/{} ready for tasks", self.pool, self.id);

        loop {
            // Only one worker waits on the channel at a time; the lock is
            // released before the task runs.
            let next = {
                let mut receiver = self.receiver.lock().await;
                receiver.recv().await
            };

            let Some(task) = next else {
                break;
            };

            let outcome = self.execute(task).await;
            self.counters.record_outcome(&outcome);
        }

        debug!("Worker {}/{} exiting", self.pool, self.id);
    }

    async fn execute(&self, task: Task) -> TaskOutcome {
        match AssertUnwindSafe(task).catch_unwind().await {
            Ok(Ok(())) => TaskOutcome::Completed,
            Ok(Err(e)) => {
                warn!("Task on worker {}/{} failed: {:#}", self.pool, self.id, e);
                TaskOutcome::Failed(format!("{:#}", e))
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(
                    "Task on worker {}/{} panicked: {}",
                    self.pool, self.id, message
                );
                TaskOutcome::Panicked(message)
            }
        }
    }
}
