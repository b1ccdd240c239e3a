//! The search loop task

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{broadcast, oneshot, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::config::SearchConfig;
use super::state::{
    SearchCallback, SearchCounters, SearchRequest, SearchSlot, SearchState, SearchStats,
};
use crate::app::catalog::{CatalogStore, ComicView};
use crate::app::pool::types::panic_message;
use crate::errors::SearchError;

/// State shared between submitters and the loop task
#[derive(Debug)]
struct Shared {
    slot: Mutex<SearchSlot>,
    wake: Notify,
    counters: SearchCounters,
    store: Arc<CatalogStore>,
}

impl Shared {
    fn take_next(&self) -> Option<SearchRequest> {
        self.slot.lock().begin_next()
    }

    /// Run one request against the snapshot current right now
    async fn execute(&self, request: SearchRequest) {
        let SearchRequest {
            id,
            keyword,
            callback,
        } = request;
        let comics = self.store.all();
        debug!("Search #{} for '{}' over {} comics", id, keyword, comics.len());

        let result = tokio::task::spawn_blocking(move || {
            let matches: Vec<ComicView> = comics
                .iter()
                .filter(|comic| comic.name_contains(&keyword))
                .cloned()
                .collect();
            let count = matches.len();
            callback(matches);
            count
        })
        .await;

        match result {
            Ok(count) => {
                debug!("Search #{} delivered {} matches", id, count);
                self.counters.record_executed();
            }
            Err(e) => {
                let reason = if e.is_panic() {
                    panic_message(&*e.into_panic())
                } else {
                    e.to_string()
                };
                warn!("Search #{} failed: {}", id, reason);
                self.counters.record_failed();
            }
        }

        self.slot.lock().finish();
    }
}

/// Single-flight, latest-wins keyword search over the catalog
///
/// One background task executes searches one at a time. While a search runs,
/// newer submissions overwrite each other in a one-request mailbox; only the
/// last one before the running search finishes is executed next. Displaced
/// requests are dropped without calling their callback.
///
/// Must be started inside a tokio runtime.
#[derive(Debug)]
pub struct SearchLoop {
    shared: Arc<Shared>,
    shutdown_tx: broadcast::Sender<()>,
    handle: Mutex<Option<JoinHandle<()>>>,
    config: SearchConfig,
}

impl SearchLoop {
    /// Spawn the loop task
    pub fn start(store: Arc<CatalogStore>, config: SearchConfig) -> Self {
        let shared = Arc::new(Shared {
            slot: Mutex::new(SearchSlot::default()),
            wake: Notify::new(),
            counters: SearchCounters::default(),
            store,
        });
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = tokio::spawn(run(shared.clone(), shutdown_rx, config.poll_interval));

        info!(
            "Search loop started (poll interval {:?})",
            config.poll_interval
        );

        Self {
            shared,
            shutdown_tx,
            handle: Mutex::new(Some(handle)),
            config,
        }
    }

    /// Submit a search; returns immediately
    ///
    /// `callback` receives the comics whose normalized name contains
    /// `keyword`, evaluated against the catalog current at execution time.
    /// It is never called if a newer search replaces this one first.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::LoopStopped` after [`shutdown`](Self::shutdown)
    pub fn search<F>(&self, keyword: impl Into<String>, callback: F) -> Result<(), SearchError>
    where
        F: FnOnce(Vec<ComicView>) + Send + 'static,
    {
        let callback: SearchCallback = Box::new(callback);
        let displaced = {
            let mut slot = self.shared.slot.lock();
            let displaced = slot.submit(keyword.into(), callback);
            if displaced.is_ok() {
                self.shared.wake.notify_one();
            }
            displaced
        };

        match displaced {
            Ok(Some(old)) => {
                self.shared.counters.record_submitted();
                self.shared.counters.record_superseded();
                debug!("Search #{} for '{}' superseded", old.id, old.keyword);
                Ok(())
            }
            Ok(None) => {
                self.shared.counters.record_submitted();
                Ok(())
            }
            Err(_) => Err(SearchError::LoopStopped),
        }
    }

    /// Submit a search and wait for its matches
    ///
    /// # Errors
    ///
    /// `SearchError::Superseded` if a newer search replaced this one before
    /// it ran, or `SearchError::LoopStopped` if the loop is shut down
    pub async fn search_latest(
        &self,
        keyword: impl Into<String>,
    ) -> Result<Vec<ComicView>, SearchError> {
        let (tx, rx) = oneshot::channel();
        self.search(keyword, move |matches| {
            let _ = tx.send(matches);
        })?;

        match rx.await {
            Ok(matches) => Ok(matches),
            Err(_) if self.shared.slot.lock().is_stopped() => Err(SearchError::LoopStopped),
            Err(_) => Err(SearchError::Superseded),
        }
    }

    pub fn state(&self) -> SearchState {
        self.shared.slot.lock().state()
    }

    pub fn stats(&self) -> SearchStats {
        self.shared.counters.snapshot()
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        !self.shared.slot.lock().is_stopped()
    }

    /// Stop the loop
    ///
    /// A search already executing finishes and delivers its result; a
    /// waiting one is discarded. Idempotent.
    pub async fn shutdown(&self) {
        let waiting = self.shared.slot.lock().stop();
        drop(waiting);

        let _ = self.shutdown_tx.send(());
        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!("Search loop ended abnormally: {}", e);
            }
            info!("Search loop stopped");
        }
    }
}

impl Drop for SearchLoop {
    fn drop(&mut self) {
        self.shared.slot.lock().stop();
        let _ = self.shutdown_tx.send(());
    }
}

async fn run(shared: Arc<Shared>, mut shutdown_rx: broadcast::Receiver<()>, poll: Duration) {
    loop {
        while let Some(request) = shared.take_next() {
            shared.execute(request).await;
        }

        tokio::select! {
            _ = shared.wake.notified() => {}
            _ = tokio::time::sleep(poll) => {}
            _ = shutdown_rx.recv() => break,
        }
    }
    debug!("Search loop exiting");
}
