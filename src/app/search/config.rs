//! Configuration for the search loop

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::search;

/// Search loop settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// How often the idle loop re-checks its slot without a wake signal
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            poll_interval: search::POLL_INTERVAL,
        }
    }
}

impl SearchConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval.is_zero() {
            return Err("Search poll interval cannot be zero".to_string());
        }
        Ok(())
    }
}
