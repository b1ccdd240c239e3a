//! Catalog data source interface
//!
//! The controller never talks to the upstream catalog directly; it goes
//! through a [`CatalogSource`]. Each fetch resolves to a complete dataset or
//! an error, and is never retried here.

use async_trait::async_trait;

use crate::app::catalog::{Comic, Episode, HostTable};
use crate::errors::SourceResult;

pub mod json;

pub use json::{JsonCatalogSource, SourceConfig};

/// Upstream provider of catalog datasets
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Every comic the site lists
    async fn fetch_all_comics(&self) -> SourceResult<Vec<Comic>>;

    /// Recently updated comics
    async fn fetch_newest_comics(&self) -> SourceResult<Vec<Comic>>;

    /// Category-to-host routing table
    async fn fetch_host_table(&self) -> SourceResult<HostTable>;

    /// Load page image URLs for an episode whose `url` is absolute
    async fn fetch_episode_detail(&self, episode: Episode) -> SourceResult<Episode>;

    /// Address of the detail page for a comic
    fn comic_detail_url(&self, comic_id: &str) -> String;
}
