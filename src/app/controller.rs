//! Catalog controller
//!
//! [`ComicCatalog`] wires the task pools, the snapshot store, the initial
//! load barrier, the search loop and the page fetcher together. The entry
//! point builds one, shares it as `Arc<ComicCatalog>`, and shuts it down on
//! exit.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::catalog::{
    CatalogStore, ComicList, ComicView, Episode, HostTable, StoreStats, TextNormalizer,
    UnicodeEscapes,
};
use crate::app::client::{ClientConfig, HttpFetcher};
use crate::app::loader::{CatalogLoader, LoadReport, LoaderConfig};
use crate::app::pool::{ConfigPresets, TaskPool, TaskPoolConfig, TaskPoolStats};
use crate::app::search::{SearchConfig, SearchLoop, SearchStats};
use crate::app::source::CatalogSource;
use crate::constants::pools;
use crate::errors::{CatalogError, CatalogResult, PoolResult, Result, SearchError, TransportResult};

/// Runtime settings for every component of the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub tasks: TaskPoolConfig,
    pub search: SearchConfig,
    pub loader: LoaderConfig,
    pub client: ClientConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            tasks: ConfigPresets::general(),
            search: SearchConfig::default(),
            loader: LoaderConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

/// Point-in-time view of every component's counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub tasks: TaskPoolStats,
    pub ordered_tasks: TaskPoolStats,
    pub search: SearchStats,
    pub store: StoreStats,
}

/// The catalog controller
pub struct ComicCatalog {
    tasks: TaskPool,
    ordered: TaskPool,
    store: Arc<CatalogStore>,
    loader: CatalogLoader,
    search: SearchLoop,
    fetcher: HttpFetcher,
    source: Arc<dyn CatalogSource>,
    shutdown_timeout: Duration,
}

impl ComicCatalog {
    /// Build the controller and start its workers and search loop
    ///
    /// Nothing is fetched yet; call [`load_all`](Self::load_all) or
    /// [`spawn_initial_load`](Self::spawn_initial_load).
    ///
    /// # Errors
    ///
    /// Returns an error if the page fetcher cannot be built
    pub fn start(config: CatalogConfig, source: Arc<dyn CatalogSource>) -> Result<Arc<Self>> {
        Self::start_with_normalizer(config, source, Arc::new(UnicodeEscapes))
    }

    /// Like [`start`](Self::start) with a custom display-text normalizer
    pub fn start_with_normalizer(
        config: CatalogConfig,
        source: Arc<dyn CatalogSource>,
        normalizer: Arc<dyn TextNormalizer>,
    ) -> Result<Arc<Self>> {
        let fetcher = HttpFetcher::new(&config.client)?;
        let store = Arc::new(CatalogStore::new());
        let loader = CatalogLoader::new(
            source.clone(),
            store.clone(),
            normalizer,
            config.loader.clone(),
        );
        let shutdown_timeout = config.tasks.shutdown_timeout;

        let catalog = Self {
            tasks: TaskPool::new(pools::TASK_POOL_NAME, config.tasks),
            ordered: TaskPool::new(
                pools::SEQUENTIAL_POOL_NAME,
                ConfigPresets::sequential().with_shutdown_timeout(shutdown_timeout),
            ),
            search: SearchLoop::start(store.clone(), config.search),
            store,
            loader,
            fetcher,
            source,
            shutdown_timeout,
        };

        info!("Comic catalog started");
        Ok(Arc::new(catalog))
    }

    /// Run the initial load on the general pool
    ///
    /// Returns once the load is queued; `on_complete` runs on a pool worker
    /// after all three datasets have settled.
    pub fn spawn_initial_load<F>(self: &Arc<Self>, on_complete: F) -> PoolResult<()>
    where
        F: FnOnce(&LoadReport) + Send + 'static,
    {
        let catalog = Arc::clone(self);
        self.tasks.submit(async move {
            catalog.load_all(on_complete).await;
            Ok(())
        })
    }

    /// Fetch all three datasets in parallel and wait for them
    pub async fn load_all<F>(&self, on_complete: F) -> LoadReport
    where
        F: FnOnce(&LoadReport),
    {
        self.loader.load_all(on_complete).await
    }

    /// Run work on the general pool, in no particular order
    pub fn add_task<F>(&self, task: F) -> PoolResult<()>
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.tasks.submit(task)
    }

    /// Run work on the single-worker pool, in submission order
    pub fn add_ordered_task<F>(&self, task: F) -> PoolResult<()>
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.ordered.submit(task)
    }

    pub fn all_comics(&self) -> ComicList {
        self.store.all()
    }

    pub fn newest_comics(&self) -> ComicList {
        self.store.newest()
    }

    pub fn host_table(&self) -> Arc<HostTable> {
        self.store.hosts()
    }

    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    pub fn find_by_id(&self, id: &str) -> Option<ComicView> {
        self.store.find_by_id(id)
    }

    pub fn find_newest_by_id(&self, id: &str) -> Option<ComicView> {
        self.store.find_newest_by_id(id)
    }

    /// Submit a latest-wins keyword search
    pub fn search<F>(&self, keyword: impl Into<String>, callback: F) -> std::result::Result<(), SearchError>
    where
        F: FnOnce(Vec<ComicView>) + Send + 'static,
    {
        self.search.search(keyword, callback)
    }

    /// Submit a search and wait for its matches
    pub async fn search_latest(
        &self,
        keyword: impl Into<String>,
    ) -> std::result::Result<Vec<ComicView>, SearchError> {
        self.search.search_latest(keyword).await
    }

    /// Load page image URLs for an episode
    ///
    /// A relative episode URL is resolved against the host table first.
    /// Scheme-relative page URLs come back prefixed with `https:`.
    ///
    /// # Errors
    ///
    /// `CatalogError::UnknownHost` if the episode's category has no host,
    /// or `CatalogError::Source` if the detail fetch fails
    pub async fn load_episode_pages(&self, mut episode: Episode) -> CatalogResult<Episode> {
        if !episode.has_absolute_url() {
            episode.url = self.store.hosts().resolve(&episode.url, &episode.catid)?;
        }
        debug!("Loading pages for episode '{}' from {}", episode.name, episode.url);

        let mut episode = self.source.fetch_episode_detail(episode).await?;
        episode.normalize_page_urls();
        Ok(episode)
    }

    /// Load episode pages on the ordered pool and hand the result to `callback`
    pub fn load_episode_pages_with<F>(self: &Arc<Self>, episode: Episode, callback: F) -> PoolResult<()>
    where
        F: FnOnce(CatalogResult<Episode>) + Send + 'static,
    {
        let catalog = Arc::clone(self);
        self.ordered.submit(async move {
            callback(catalog.load_episode_pages(episode).await);
            Ok(())
        })
    }

    /// Load pages for the episode at `index` of a comic and store them on it
    pub async fn load_comic_episode(&self, comic_id: &str, index: usize) -> CatalogResult<Episode> {
        let comic = self
            .find_by_id(comic_id)
            .ok_or_else(|| CatalogError::NotFound {
                id: comic_id.to_string(),
            })?;
        let episode = comic
            .episode(index)
            .ok_or_else(|| CatalogError::EpisodeNotFound {
                comic_id: comic_id.to_string(),
                index,
            })?;

        let loaded = self.load_episode_pages(episode).await?;
        if let Some(slot) = comic.inner().write().episodes.get_mut(index) {
            *slot = loaded.clone();
        }
        Ok(loaded)
    }

    /// Address of a comic's detail page
    pub fn comic_detail_url(&self, comic_id: &str) -> String {
        self.source.comic_detail_url(comic_id)
    }

    /// GET a page as text in the given charset
    ///
    /// # Errors
    ///
    /// Any transport failure is returned as-is
    pub async fn request_get_http(&self, url: &str, charset: &str) -> TransportResult<String> {
        self.fetcher.get_text(url, charset).await
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            tasks: self.tasks.stats(),
            ordered_tasks: self.ordered.stats(),
            search: self.search.stats(),
            store: self.store.stats(),
        }
    }

    /// Stop the search loop and drain both pools
    ///
    /// # Errors
    ///
    /// Returns `PoolError::ShutdownTimeout` if a pool does not drain in time
    pub async fn shutdown(&self) -> Result<()> {
        info!("Shutting down comic catalog");
        self.search.shutdown().await;
        self.ordered.shutdown(self.shutdown_timeout).await?;
        self.tasks.shutdown(self.shutdown_timeout).await?;
        Ok(())
    }
}

impl fmt::Debug for ComicCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComicCatalog")
            .field("tasks", &self.tasks)
            .field("ordered", &self.ordered)
            .field("store", &self.store)
            .field("search", &self.search)
            .finish_non_exhaustive()
    }
}
