//! Core application logic for the comic catalog
//!
//! This module contains the catalog controller and the components it owns:
//! task pools, the snapshot store and its entities, the catalog source
//! interface, the initial load barrier, the search loop and the page fetcher.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use comic_catalog::app::{CatalogConfig, ClientConfig, ComicCatalog, JsonCatalogSource, SourceConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ClientConfig::default().build_http_client()?;
//! let source = Arc::new(JsonCatalogSource::new(SourceConfig::default(), client));
//! let catalog = ComicCatalog::start(CatalogConfig::default(), source)?;
//!
//! // Fire-and-forget initial load on the general pool
//! catalog.spawn_initial_load(|report| println!("catalog ready: {}", report))?;
//!
//! // Later, from any task
//! let matches = catalog.search_latest("One").await?;
//! for comic in matches {
//!     println!("{}", comic.name_with_newest_episode());
//! }
//! catalog.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod client;
pub mod controller;
pub mod loader;
pub mod pool;
pub mod search;
pub mod source;

// Re-export main public API
pub use catalog::{
    CatalogSnapshot, CatalogStore, Comic, ComicList, ComicView, Episode, HostTable, Identity,
    StoreStats, TextNormalizer, UnicodeEscapes,
};
pub use client::{ClientConfig, HttpFetcher};
pub use controller::{CatalogConfig, CatalogStats, ComicCatalog};
pub use loader::{CatalogLoader, FetchOutcome, LoadReport, LoaderConfig};
pub use pool::{ConfigPresets, TaskPool, TaskPoolConfig, TaskPoolStats};
pub use search::{SearchConfig, SearchLoop, SearchState, SearchStats};
pub use source::{CatalogSource, JsonCatalogSource, SourceConfig};
