//! Prelude module for the comic catalog library
//!
//! Re-exports the items most integrations need, so a single
//! `use comic_catalog::prelude::*;` is enough to start a controller.
//!
//! # Usage
//!
//! ```rust,no_run
//! use comic_catalog::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let source = Arc::new(JsonCatalogSource::new(
//!         SourceConfig::default(),
//!         ClientConfig::default().build_http_client()?,
//!     ));
//!     let catalog = ComicCatalog::start(CatalogConfig::default(), source)?;
//!
//!     let report = catalog.load_all(|_| {}).await;
//!     println!("{}", report);
//!     catalog.shutdown().await
//! }
//! ```

pub use crate::errors::{AppError, Result};

pub use crate::app::{
    CatalogConfig, CatalogSource, CatalogStore, ClientConfig, Comic, ComicCatalog, ComicView,
    Episode, FetchOutcome, HostTable, JsonCatalogSource, LoadReport, SearchState, SourceConfig,
    TaskPool,
};
