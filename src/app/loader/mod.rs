//! Initial load barrier
//!
//! Fetches the full catalog, the newest list and the host table in parallel.
//! Each fetch publishes its own dataset into the [`CatalogStore`] as soon as
//! it succeeds. The barrier is released only when all three have either
//! succeeded, failed or timed out, after which the completion callback runs
//! exactly once.
//!
//! A failed or timed-out dataset leaves its store slot at the previous value.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::catalog::{CatalogStore, Comic, ComicView, TextNormalizer};
use crate::app::pool::types::panic_message;
use crate::app::source::CatalogSource;
use crate::constants::loader;
use crate::errors::{SourceError, SourceResult};

pub mod report;

pub use report::{FetchOutcome, LoadReport};

/// Configuration for the initial load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Upper bound on each dataset fetch
    #[serde(with = "humantime_serde")]
    pub fetch_timeout: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: loader::FETCH_TIMEOUT,
        }
    }
}

impl LoaderConfig {
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.fetch_timeout.is_zero() {
            return Err("Fetch timeout cannot be zero".to_string());
        }
        Ok(())
    }
}

/// Runs the three-way parallel load into a store
pub struct CatalogLoader {
    source: Arc<dyn CatalogSource>,
    store: Arc<CatalogStore>,
    normalizer: Arc<dyn TextNormalizer>,
    config: LoaderConfig,
}

impl CatalogLoader {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        store: Arc<CatalogStore>,
        normalizer: Arc<dyn TextNormalizer>,
        config: LoaderConfig,
    ) -> Self {
        Self {
            source,
            store,
            normalizer,
            config,
        }
    }

    /// Load all three datasets, then call `on_complete` once
    ///
    /// Never fails as a whole: per-dataset problems are logged and reported
    /// in the returned [`LoadReport`].
    pub async fn load_all<F>(&self, on_complete: F) -> LoadReport
    where
        F: FnOnce(&LoadReport),
    {
        let started = Instant::now();
        info!(
            "Loading catalog (fetch timeout {:?})",
            self.config.fetch_timeout
        );

        let all = {
            let source = self.source.clone();
            let store = self.store.clone();
            let normalizer = self.normalizer.clone();
            self.spawn_fetch(
                loader::ALL_COMICS,
                async move { source.fetch_all_comics().await },
                move |comics| {
                    let views = wrap(comics, &normalizer);
                    let count = views.len();
                    store.replace_all(views);
                    count
                },
            )
        };

        let newest = {
            let source = self.source.clone();
            let store = self.store.clone();
            let normalizer = self.normalizer.clone();
            self.spawn_fetch(
                loader::NEWEST_COMICS,
                async move { source.fetch_newest_comics().await },
                move |comics| {
                    let views = wrap(comics, &normalizer);
                    let count = views.len();
                    store.replace_newest(views);
                    count
                },
            )
        };

        let hosts = {
            let source = self.source.clone();
            let store = self.store.clone();
            self.spawn_fetch(
                loader::HOST_TABLE,
                async move { source.fetch_host_table().await },
                move |table| {
                    let count = table.len();
                    store.replace_hosts(table);
                    count
                },
            )
        };

        let (all, newest, hosts) = tokio::join!(
            settle(loader::ALL_COMICS, all),
            settle(loader::NEWEST_COMICS, newest),
            settle(loader::HOST_TABLE, hosts),
        );

        let report = LoadReport {
            all_comics: all,
            newest_comics: newest,
            host_table: hosts,
            elapsed: started.elapsed(),
        };

        if report.is_complete() {
            info!("Catalog loaded: {}", report);
        } else {
            warn!("Catalog partially loaded: {}", report);
        }

        on_complete(&report);
        report
    }

    /// Load without a completion callback
    pub async fn load(&self) -> LoadReport {
        self.load_all(|_| {}).await
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    fn spawn_fetch<T, Fut, P>(
        &self,
        dataset: &'static str,
        fetch: Fut,
        publish: P,
    ) -> JoinHandle<FetchOutcome>
    where
        T: Send + 'static,
        Fut: Future<Output = SourceResult<T>> + Send + 'static,
        P: FnOnce(T) -> usize + Send + 'static,
    {
        let timeout = self.config.fetch_timeout;

        tokio::spawn(async move {
            debug!("Fetching {}", dataset);
            match tokio::time::timeout(timeout, fetch).await {
                Ok(Ok(data)) => {
                    let count = publish(data);
                    debug!("Fetched {}: {} entries", dataset, count);
                    FetchOutcome::Loaded { count }
                }
                Ok(Err(e)) => {
                    warn!("Fetching {} failed, keeping previous data: {}", dataset, e);
                    FetchOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
                Err(_) => {
                    let err = SourceError::Timeout {
                        dataset: dataset.to_string(),
                        seconds: timeout.as_secs(),
                    };
                    warn!("{}, keeping previous data", err);
                    FetchOutcome::TimedOut { after: timeout }
                }
            }
        })
    }
}

/// Wait for a spawned fetch, mapping a panic or cancellation to `Failed`
async fn settle(dataset: &'static str, handle: JoinHandle<FetchOutcome>) -> FetchOutcome {
    match handle.await {
        Ok(outcome) => outcome,
        Err(e) => {
            let reason = if e.is_panic() {
                format!("fetch panicked: {}", panic_message(&*e.into_panic()))
            } else {
                "fetch cancelled".to_string()
            };
            warn!("Fetching {} did not finish: {}", dataset, reason);
            FetchOutcome::Failed { reason }
        }
    }
}

fn wrap(comics: Vec<Comic>, normalizer: &Arc<dyn TextNormalizer>) -> Vec<ComicView> {
    comics
        .into_iter()
        .map(|comic| ComicView::new(comic, normalizer.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::catalog::{Episode, HostTable, UnicodeEscapes};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Copy, PartialEq)]
    enum Mode {
        Ok,
        Fail,
        Hang,
        Panic,
    }

    struct StubSource {
        all: Mode,
        newest: Mode,
        hosts: Mode,
        batch: &'static str,
    }

    impl StubSource {
        fn new(all: Mode, newest: Mode, hosts: Mode, batch: &'static str) -> Self {
            Self {
                all,
                newest,
                hosts,
                batch,
            }
        }

        async fn run<T>(&self, mode: Mode, value: T) -> SourceResult<T> {
            match mode {
                Mode::Ok => Ok(value),
                Mode::Fail => Err(SourceError::Unavailable {
                    reason: "stub failure".to_string(),
                }),
                Mode::Hang => std::future::pending().await,
                Mode::Panic => panic!("stub panic"),
            }
        }

        fn comics(&self, n: usize) -> Vec<Comic> {
            (0..n)
                .map(|i| Comic::new(format!("{}-{}", self.batch, i), format!("comic {}", i)))
                .collect()
        }
    }

    #[async_trait]
    impl CatalogSource for StubSource {
        async fn fetch_all_comics(&self) -> SourceResult<Vec<Comic>> {
            self.run(self.all, self.comics(5)).await
        }

        async fn fetch_newest_comics(&self) -> SourceResult<Vec<Comic>> {
            self.run(self.newest, self.comics(2)).await
        }

        async fn fetch_host_table(&self) -> SourceResult<HostTable> {
            let table = [("1".to_string(), "https://h".to_string())]
                .into_iter()
                .collect();
            self.run(self.hosts, table).await
        }

        async fn fetch_episode_detail(&self, episode: Episode) -> SourceResult<Episode> {
            Ok(episode)
        }

        fn comic_detail_url(&self, comic_id: &str) -> String {
            comic_id.to_string()
        }
    }

    fn loader(source: StubSource, store: Arc<CatalogStore>) -> CatalogLoader {
        CatalogLoader::new(
            Arc::new(source),
            store,
            Arc::new(UnicodeEscapes),
            LoaderConfig::default().with_fetch_timeout(Duration::from_millis(200)),
        )
    }

    #[tokio::test]
    async fn test_all_datasets_loaded() {
        let store = Arc::new(CatalogStore::new());
        let calls = AtomicUsize::new(0);

        let report = loader(StubSource::new(Mode::Ok, Mode::Ok, Mode::Ok, "a"), store.clone())
            .load_all(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        assert!(report.is_complete());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.all().len(), 5);
        assert_eq!(store.newest().len(), 2);
        assert_eq!(store.hosts().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_dataset_keeps_previous_snapshot() {
        let store = Arc::new(CatalogStore::new());
        loader(StubSource::new(Mode::Ok, Mode::Ok, Mode::Ok, "old"), store.clone())
            .load()
            .await;
        let before = store.all();

        let report = loader(StubSource::new(Mode::Fail, Mode::Ok, Mode::Ok, "new"), store.clone())
            .load()
            .await;

        assert!(matches!(report.all_comics, FetchOutcome::Failed { .. }));
        assert!(Arc::ptr_eq(&before, &store.all()));
        assert_eq!(store.newest()[0].id(), "new-0");
    }

    #[tokio::test]
    async fn test_hung_fetch_times_out_and_callback_fires() {
        let store = Arc::new(CatalogStore::new());
        let fired = AtomicUsize::new(0);

        let report = loader(StubSource::new(Mode::Ok, Mode::Hang, Mode::Ok, "a"), store.clone())
            .load_all(|r| {
                assert!(!r.is_complete());
                fired.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(matches!(report.newest_comics, FetchOutcome::TimedOut { .. }));
        assert!(store.newest().is_empty());
        assert_eq!(store.all().len(), 5);
    }

    #[tokio::test]
    async fn test_panicking_fetch_reported_as_failed() {
        let store = Arc::new(CatalogStore::new());
        let report = loader(StubSource::new(Mode::Ok, Mode::Ok, Mode::Panic, "a"), store.clone())
            .load()
            .await;

        match &report.host_table {
            FetchOutcome::Failed { reason } => assert!(reason.contains("stub panic")),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(store.hosts().is_empty());
    }
}
