//! Comic Catalog Library
//!
//! Concurrency core of a comic aggregation client: bounded and ordered task
//! pools, a parallel initial catalog load with a completion barrier, and a
//! latest-wins search loop over swap-on-replace catalog snapshots.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(DEFAULT_TASK_WORKERS, 10);
        assert_eq!(SEQUENTIAL_WORKERS, 1);
        assert_eq!(POLL_INTERVAL.as_millis(), 500);
        assert!(USER_AGENT.contains("Mozilla"));
    }

    #[test]
    fn test_error_types() {
        let app_error = AppError::from(errors::SearchError::LoopStopped);
        assert_eq!(app_error.category(), "search");
        assert!(!app_error.is_recoverable());
    }
}
