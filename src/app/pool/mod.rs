//! Fixed-size task pools for background work
//!
//! A [`TaskPool`] owns a fixed number of long-lived workers that pull
//! submitted tasks from one shared channel. Submission never waits, and a
//! task that returns an error or panics is logged and counted at the worker
//! boundary; the worker survives and moves on to the next task.
//!
//! Two shapes are used by the catalog controller:
//!
//! - a general pool with [`DEFAULT_TASK_WORKERS`](crate::constants::pools::DEFAULT_TASK_WORKERS)
//!   workers and no ordering guarantee between tasks
//! - a sequential pool with a single worker, which executes tasks strictly in
//!   submission order
//!
//! # Examples
//!
//! ```rust,no_run
//! use comic_catalog::app::pool::{TaskPool, TaskPoolConfig};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = TaskPool::new("tasks", TaskPoolConfig::default());
//! pool.submit(async {
//!     tracing::info!("background work");
//!     Ok(())
//! })?;
//!
//! let ordered = TaskPool::sequential("fifo");
//! ordered.submit_blocking(|| Ok(()))?;
//!
//! pool.shutdown(Duration::from_secs(5)).await?;
//! ordered.shutdown(Duration::from_secs(5)).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod pool;
pub mod types;

pub use config::{ConfigPresets, TaskPoolConfig};
pub use pool::TaskPool;
pub use types::{Task, TaskOutcome, TaskPoolStats};
