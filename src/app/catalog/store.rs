//! Snapshot store for the loaded catalog
//!
//! Each slot holds an `Arc` to a complete list. Writers build a new list off
//! to the side and swap the `Arc`; readers clone the `Arc` and iterate a list
//! that will never change underneath them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::models::HostTable;
use super::view::ComicView;

/// Shared, immutable list of comics
pub type ComicList = Arc<Vec<ComicView>>;

/// The comic lists visible at one instant
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub all: ComicList,
    pub newest: ComicList,
}

/// Counts and publication time of the current slots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub all_comics: usize,
    pub newest_comics: usize,
    pub hosts: usize,
    /// When any slot was last replaced
    pub last_published: Option<DateTime<Utc>>,
}

/// Holds the current catalog snapshots
#[derive(Debug, Default)]
pub struct CatalogStore {
    all: RwLock<ComicList>,
    newest: RwLock<ComicList>,
    hosts: RwLock<Arc<HostTable>>,
    last_published: RwLock<Option<DateTime<Utc>>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current full catalog
    pub fn all(&self) -> ComicList {
        self.all.read().clone()
    }

    /// Current newest-comics list
    pub fn newest(&self) -> ComicList {
        self.newest.read().clone()
    }

    /// Current host table
    pub fn hosts(&self) -> Arc<HostTable> {
        self.hosts.read().clone()
    }

    /// Both comic lists
    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            all: self.all(),
            newest: self.newest(),
        }
    }

    /// Publish a new full catalog
    pub fn replace_all(&self, comics: Vec<ComicView>) {
        debug!("Publishing {} comics", comics.len());
        *self.all.write() = Arc::new(comics);
        self.touch();
    }

    /// Publish a new newest-comics list
    pub fn replace_newest(&self, comics: Vec<ComicView>) {
        debug!("Publishing {} newest comics", comics.len());
        *self.newest.write() = Arc::new(comics);
        self.touch();
    }

    /// Publish a new host table
    pub fn replace_hosts(&self, hosts: HostTable) {
        debug!("Publishing host table with {} entries", hosts.len());
        *self.hosts.write() = Arc::new(hosts);
        self.touch();
    }

    /// Look up a comic in the full catalog
    pub fn find_by_id(&self, id: &str) -> Option<ComicView> {
        Self::find_in(&self.all(), id)
    }

    /// Look up a comic in the newest list
    pub fn find_newest_by_id(&self, id: &str) -> Option<ComicView> {
        Self::find_in(&self.newest(), id)
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            all_comics: self.all.read().len(),
            newest_comics: self.newest.read().len(),
            hosts: self.hosts.read().len(),
            last_published: *self.last_published.read(),
        }
    }

    fn find_in(list: &[ComicView], id: &str) -> Option<ComicView> {
        list.iter().find(|c| c.id() == id).cloned()
    }

    fn touch(&self) {
        *self.last_published.write() = Some(Utc::now());
    }
}
