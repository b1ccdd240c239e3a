//! Task pool configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::pools;

/// Configuration for a task pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskPoolConfig {
    /// Number of workers; fixed for the lifetime of the pool
    pub worker_count: usize,
    /// Maximum time to wait for queued tasks to drain on shutdown
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

impl Default for TaskPoolConfig {
    fn default() -> Self {
        ConfigPresets::general()
    }
}

impl TaskPoolConfig {
    /// Set the worker count
    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = count;
        self
    }

    /// Set the shutdown timeout
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.worker_count == 0 {
            return Err("Task pool worker count cannot be zero".to_string());
        }

        if self.worker_count > pools::MAX_TASK_WORKERS {
            return Err(format!(
                "Task pool worker count ({}) exceeds maximum ({})",
                self.worker_count,
                pools::MAX_TASK_WORKERS
            ));
        }

        if self.shutdown_timeout.is_zero() {
            return Err("Task pool shutdown timeout cannot be zero".to_string());
        }

        Ok(())
    }
}

/// Preset pool shapes
pub struct ConfigPresets;

impl ConfigPresets {
    /// Unordered pool for independent background work
    pub fn general() -> TaskPoolConfig {
        TaskPoolConfig {
            worker_count: pools::DEFAULT_TASK_WORKERS,
            shutdown_timeout: Duration::from_secs(10),
        }
    }

    /// Single-worker pool that preserves submission order
    pub fn sequential() -> TaskPoolConfig {
        TaskPoolConfig {
            worker_count: pools::SEQUENTIAL_WORKERS,
            shutdown_timeout: Duration::from_secs(10),
        }
    }

    /// Small pool with short timeouts for tests
    pub fn testing() -> TaskPoolConfig {
        TaskPoolConfig {
            worker_count: 2,
            shutdown_timeout: Duration::from_secs(2),
        }
    }
}
