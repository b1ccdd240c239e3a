//! Outcome reporting for a catalog load

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::constants::loader;

/// How a single dataset fetch ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// Fetched and published; `count` items now in the store
    Loaded { count: usize },
    /// The source returned an error or the fetch panicked; store untouched
    Failed { reason: String },
    /// No answer within the fetch timeout; store untouched
    TimedOut {
        #[serde(with = "humantime_serde")]
        after: Duration,
    },
}

impl FetchOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded { count } => write!(f, "loaded {}", count),
            Self::Failed { reason } => write!(f, "failed: {}", reason),
            Self::TimedOut { after } => write!(f, "timed out after {:?}", after),
        }
    }
}

/// Result of one run of the initial load barrier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub all_comics: FetchOutcome,
    pub newest_comics: FetchOutcome,
    pub host_table: FetchOutcome,
    /// Wall time from the first fetch start to the barrier release
    #[serde(with = "humantime_serde")]
    pub elapsed: Duration,
}

impl LoadReport {
    /// Every dataset was loaded
    pub fn is_complete(&self) -> bool {
        self.outcomes().all(|(_, outcome)| outcome.is_loaded())
    }

    /// Dataset labels paired with their outcome
    pub fn outcomes(&self) -> impl Iterator<Item = (&'static str, &FetchOutcome)> {
        let outcomes: [(&'static str, &FetchOutcome); loader::DATASET_COUNT] = [
            (loader::ALL_COMICS, &self.all_comics),
            (loader::NEWEST_COMICS, &self.newest_comics),
            (loader::HOST_TABLE, &self.host_table),
        ];
        outcomes.into_iter()
    }

    /// Datasets that were not loaded
    pub fn failures(&self) -> Vec<(&'static str, &FetchOutcome)> {
        self.outcomes().filter(|(_, o)| !o.is_loaded()).collect()
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .outcomes()
            .map(|(dataset, outcome)| format!("{}: {}", dataset, outcome))
            .collect();
        write!(f, "{} ({:.2?})", parts.join(", "), self.elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(all: FetchOutcome) -> LoadReport {
        LoadReport {
            all_comics: all,
            newest_comics: FetchOutcome::Loaded { count: 3 },
            host_table: FetchOutcome::Loaded { count: 2 },
            elapsed: Duration::from_millis(120),
        }
    }

    #[test]
    fn test_complete_report() {
        let r = report(FetchOutcome::Loaded { count: 10 });
        assert!(r.is_complete());
        assert!(r.failures().is_empty());
        assert!(r.to_string().starts_with("all comics: loaded 10"));
        assert_eq!(r.outcomes().count(), loader::DATASET_COUNT);
    }

    #[test]
    fn test_partial_report_lists_failures() {
        let r = report(FetchOutcome::TimedOut {
            after: Duration::from_secs(30),
        });
        assert!(!r.is_complete());

        let failures = r.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, loader::ALL_COMICS);
    }

    #[test]
    fn test_report_serializes_with_status_tag() {
        let r = report(FetchOutcome::Failed {
            reason: "boom".to_string(),
        });
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["all_comics"]["status"], "failed");
        assert_eq!(json["newest_comics"]["count"], 3);
    }
}
