//! Catalog data models
//!
//! Raw entities as delivered by a catalog source. Display text is stored
//! exactly as received; normalization happens at read time in
//! [`ComicView`](super::view::ComicView).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::episodes::IMAGE_URL_SCHEME;
use crate::errors::{CatalogError, CatalogResult};

/// A comic entry in the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comic {
    /// Stable identifier, unique within a catalog
    pub id: String,
    /// Title, possibly containing escape sequences
    pub name: String,
    /// Author, possibly containing escape sequences
    pub author: String,
    /// Synopsis; absent until the detail page is loaded
    pub description: Option<String>,
    /// Cover image URL
    #[serde(alias = "iconUrl")]
    pub icon_url: String,
    /// Thumbnail URL
    #[serde(alias = "smallIconUrl")]
    pub small_icon_url: String,
    /// Label of the most recent episode
    #[serde(alias = "newestEpisode")]
    pub newest_episode: String,
    /// Last update as published by the source
    #[serde(alias = "latestUpdateDateTime")]
    pub latest_update_date_time: String,
    /// Episodes in source order
    pub episodes: Vec<Episode>,
}

impl Comic {
    /// Create a comic with only an id and a name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }
}

/// One chapter of a comic
///
/// Starts as a stub (name and relative url) and is enriched with page
/// image URLs when its detail is fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Episode {
    /// Display label
    pub name: String,
    /// Relative or absolute URL of the episode page
    pub url: String,
    /// Routing key into the [`HostTable`]
    pub catid: String,
    /// Page image URLs, empty until detail-loaded
    pub pages: Vec<String>,
}

impl Episode {
    /// Create an episode stub
    pub fn new(name: impl Into<String>, url: impl Into<String>, catid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            catid: catid.into(),
            pages: Vec::new(),
        }
    }

    /// Whether page image URLs have been loaded
    pub fn is_detail_loaded(&self) -> bool {
        !self.pages.is_empty()
    }

    /// Whether the episode URL already carries a scheme and host
    pub fn has_absolute_url(&self) -> bool {
        self.url.starts_with("http")
    }

    /// Prefix scheme-relative page URLs (`//host/...`) with `https:`
    pub fn normalize_page_urls(&mut self) {
        for page in &mut self.pages {
            if page.starts_with("//") {
                page.insert_str(0, IMAGE_URL_SCHEME);
            }
        }
    }
}

/// Mapping from category key to download host base URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostTable {
    hosts: HashMap<String, String>,
}

impl HostTable {
    /// Build a table from a prepared map
    pub fn new(hosts: HashMap<String, String>) -> Self {
        Self { hosts }
    }

    /// Base URL registered for a category
    pub fn base_for(&self, catid: &str) -> Option<&str> {
        self.hosts.get(catid).map(String::as_str)
    }

    /// Turn an episode URL into an absolute one
    ///
    /// URLs that already start with `http` are returned unchanged; anything
    /// else is prefixed with the host registered for `catid`.
    pub fn resolve(&self, url: &str, catid: &str) -> CatalogResult<String> {
        if url.starts_with("http") {
            return Ok(url.to_string());
        }

        let base = self
            .base_for(catid)
            .ok_or_else(|| CatalogError::UnknownHost {
                catid: catid.to_string(),
            })?;
        Ok(format!("{}{}", base, url))
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl FromIterator<(String, String)> for HostTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            hosts: iter.into_iter().collect(),
        }
    }
}
