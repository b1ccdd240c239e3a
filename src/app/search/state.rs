//! Mailbox state for the search loop
//!
//! The slot holds at most one request. Submitting while a request is waiting
//! replaces it; the replaced request is returned to the caller so it can be
//! dropped outside the lock.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::app::catalog::ComicView;

/// Receives the matches of one search
pub type SearchCallback = Box<dyn FnOnce(Vec<ComicView>) + Send + 'static>;

/// One keyword search waiting for execution
pub struct SearchRequest {
    pub(crate) id: u64,
    pub(crate) keyword: String,
    pub(crate) callback: SearchCallback,
}

impl fmt::Debug for SearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchRequest")
            .field("id", &self.id)
            .field("keyword", &self.keyword)
            .finish_non_exhaustive()
    }
}

/// Observable state of the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchState {
    /// Nothing waiting, nothing running
    Idle,
    /// A request is waiting to run (possibly behind one that is executing)
    PendingRequest,
    /// A request is running and none is waiting
    Executing,
}

/// Counters over the loop's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub submitted: u64,
    /// Requests whose callback ran to completion
    pub executed: u64,
    /// Requests replaced before they started; callback never called
    pub superseded: u64,
    /// Requests whose execution panicked
    pub failed: u64,
}

/// The single-request mailbox guarded by the loop's mutex
#[derive(Debug, Default)]
pub(crate) struct SearchSlot {
    current: Option<SearchRequest>,
    executing: bool,
    stopped: bool,
    next_id: u64,
}

impl SearchSlot {
    /// Make `keyword` the current request
    ///
    /// Returns the request it displaced, if any. After the loop has stopped
    /// the new request itself is handed back.
    pub(crate) fn submit(
        &mut self,
        keyword: String,
        callback: SearchCallback,
    ) -> Result<Option<SearchRequest>, SearchRequest> {
        self.next_id += 1;
        let request = SearchRequest {
            id: self.next_id,
            keyword,
            callback,
        };

        if self.stopped {
            return Err(request);
        }
        Ok(self.current.replace(request))
    }

    /// Take the current request and mark the loop as executing
    pub(crate) fn begin_next(&mut self) -> Option<SearchRequest> {
        let request = self.current.take()?;
        self.executing = true;
        Some(request)
    }

    pub(crate) fn finish(&mut self) {
        self.executing = false;
    }

    /// Refuse further requests and hand back the waiting one
    pub(crate) fn stop(&mut self) -> Option<SearchRequest> {
        self.stopped = true;
        self.current.take()
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub(crate) fn state(&self) -> SearchState {
        match (&self.current, self.executing) {
            (Some(_), _) => SearchState::PendingRequest,
            (None, true) => SearchState::Executing,
            (None, false) => SearchState::Idle,
        }
    }
}

/// Lock-free counters behind [`SearchStats`]
#[derive(Debug, Default)]
pub(crate) struct SearchCounters {
    submitted: AtomicU64,
    executed: AtomicU64,
    superseded: AtomicU64,
    failed: AtomicU64,
}

impl SearchCounters {
    pub(crate) fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_executed(&self) {
        self.executed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_superseded(&self) {
        self.superseded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> SearchStats {
        SearchStats {
            submitted: self.submitted.load(Ordering::Relaxed),
            executed: self.executed.load(Ordering::Relaxed),
            superseded: self.superseded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> SearchCallback {
        Box::new(|_| {})
    }

    #[test]
    fn test_state_transitions() {
        let mut slot = SearchSlot::default();
        assert_eq!(slot.state(), SearchState::Idle);

        assert!(slot.submit("a".to_string(), noop()).unwrap().is_none());
        assert_eq!(slot.state(), SearchState::PendingRequest);

        let request = slot.begin_next().unwrap();
        assert_eq!(request.keyword, "a");
        assert_eq!(slot.state(), SearchState::Executing);

        // New request while executing
        slot.submit("b".to_string(), noop()).unwrap();
        assert_eq!(slot.state(), SearchState::PendingRequest);

        slot.finish();
        assert_eq!(slot.state(), SearchState::PendingRequest);
        assert_eq!(slot.begin_next().unwrap().keyword, "b");
        slot.finish();
        assert_eq!(slot.state(), SearchState::Idle);
    }

    #[test]
    fn test_latest_request_wins() {
        let mut slot = SearchSlot::default();
        slot.submit("r1".to_string(), noop()).unwrap();
        let displaced = slot.submit("r2".to_string(), noop()).unwrap().unwrap();
        assert_eq!(displaced.keyword, "r1");
        let displaced = slot.submit("r3".to_string(), noop()).unwrap().unwrap();
        assert_eq!(displaced.keyword, "r2");

        let next = slot.begin_next().unwrap();
        assert_eq!(next.keyword, "r3");
        assert_eq!(next.id, 3);
        assert!(slot.begin_next().is_none());
    }

    #[test]
    fn test_stopped_slot_rejects() {
        let mut slot = SearchSlot::default();
        slot.submit("waiting".to_string(), noop()).unwrap();

        assert_eq!(slot.stop().map(|r| r.keyword), Some("waiting".to_string()));
        assert!(slot.is_stopped());
        assert!(slot.submit("late".to_string(), noop()).is_err());
        assert_eq!(slot.state(), SearchState::Idle);
    }
}
