//! Read-time decorator over a shared [`Comic`]

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::models::{Comic, Episode};
use super::normalize::{TextNormalizer, UnicodeEscapes};

/// Normalizing view of a comic
///
/// Holds one shared comic and never copies its fields. Text getters
/// (`name`, `author`, `description`) run the normalizer on every read;
/// all other getters and every setter go straight to the wrapped comic, so
/// out-of-band changes are visible through the view immediately. Clones
/// share the same underlying comic.
#[derive(Clone)]
pub struct ComicView {
    comic: Arc<RwLock<Comic>>,
    normalizer: Arc<dyn TextNormalizer>,
}

impl ComicView {
    /// Wrap a comic with the given normalizer
    pub fn new(comic: Comic, normalizer: Arc<dyn TextNormalizer>) -> Self {
        Self::from_shared(Arc::new(RwLock::new(comic)), normalizer)
    }

    /// Wrap an already shared comic
    pub fn from_shared(comic: Arc<RwLock<Comic>>, normalizer: Arc<dyn TextNormalizer>) -> Self {
        Self { comic, normalizer }
    }

    /// Wrap a comic with the default `\uXXXX` decoder
    pub fn with_default_normalizer(comic: Comic) -> Self {
        Self::new(comic, Arc::new(UnicodeEscapes))
    }

    /// Handle to the wrapped comic
    pub fn inner(&self) -> Arc<RwLock<Comic>> {
        self.comic.clone()
    }

    /// Copy of the raw, unnormalized comic
    pub fn raw(&self) -> Comic {
        self.comic.read().clone()
    }

    pub fn name(&self) -> String {
        self.normalizer.normalize(&self.comic.read().name)
    }

    pub fn author(&self) -> String {
        self.normalizer.normalize(&self.comic.read().author)
    }

    pub fn description(&self) -> Option<String> {
        self.comic
            .read()
            .description
            .as_deref()
            .map(|d| self.normalizer.normalize(d))
    }

    pub fn id(&self) -> String {
        self.comic.read().id.clone()
    }

    pub fn icon_url(&self) -> String {
        self.comic.read().icon_url.clone()
    }

    pub fn small_icon_url(&self) -> String {
        self.comic.read().small_icon_url.clone()
    }

    pub fn newest_episode(&self) -> String {
        self.comic.read().newest_episode.clone()
    }

    pub fn latest_update_date_time(&self) -> String {
        self.comic.read().latest_update_date_time.clone()
    }

    pub fn episodes(&self) -> Vec<Episode> {
        self.comic.read().episodes.clone()
    }

    /// Episode at `index` in source order
    pub fn episode(&self, index: usize) -> Option<Episode> {
        self.comic.read().episodes.get(index).cloned()
    }

    /// Episode labels in source order
    pub fn episode_names(&self) -> Vec<String> {
        self.comic
            .read()
            .episodes
            .iter()
            .map(|e| e.name.clone())
            .collect()
    }

    /// Normalized title with the latest episode label, e.g. `Title[120]`
    pub fn name_with_newest_episode(&self) -> String {
        format!("{}[{}]", self.name(), self.newest_episode())
    }

    /// Whether the normalized title contains `keyword`
    pub fn name_contains(&self, keyword: &str) -> bool {
        self.name().contains(keyword)
    }

    pub fn set_id(&self, id: impl Into<String>) {
        self.comic.write().id = id.into();
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.comic.write().name = name.into();
    }

    pub fn set_author(&self, author: impl Into<String>) {
        self.comic.write().author = author.into();
    }

    pub fn set_description(&self, description: Option<String>) {
        self.comic.write().description = description;
    }

    pub fn set_icon_url(&self, url: impl Into<String>) {
        self.comic.write().icon_url = url.into();
    }

    pub fn set_small_icon_url(&self, url: impl Into<String>) {
        self.comic.write().small_icon_url = url.into();
    }

    pub fn set_newest_episode(&self, label: impl Into<String>) {
        self.comic.write().newest_episode = label.into();
    }

    pub fn set_latest_update_date_time(&self, value: impl Into<String>) {
        self.comic.write().latest_update_date_time = value.into();
    }

    pub fn set_episodes(&self, episodes: Vec<Episode>) {
        self.comic.write().episodes = episodes;
    }
}

impl fmt::Debug for ComicView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let comic = self.comic.read();
        f.debug_struct("ComicView")
            .field("id", &comic.id)
            .field("name", &comic.name)
            .field("normalizer", &self.normalizer)
            .finish()
    }
}
