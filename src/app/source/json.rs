//! HTTP + JSON catalog source

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::CatalogSource;
use crate::app::catalog::{Comic, Episode, HostTable};
use crate::errors::{SourceError, SourceResult};

/// Placeholder replaced by the comic id in `comic_detail_url`
pub const ID_PLACEHOLDER: &str = "{id}";

/// Endpoints of a JSON catalog service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub all_comics_url: String,
    pub newest_comics_url: String,
    pub host_table_url: String,
    /// Template containing `{id}`
    pub comic_detail_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            all_comics_url: "http://localhost:8080/comics/all.json".to_string(),
            newest_comics_url: "http://localhost:8080/comics/newest.json".to_string(),
            host_table_url: "http://localhost:8080/hosts.json".to_string(),
            comic_detail_url: "http://localhost:8080/html/{id}.html".to_string(),
        }
    }
}

impl SourceConfig {
    /// Check that every endpoint parses as a URL
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let detail_sample = self.comic_detail_url.replace(ID_PLACEHOLDER, "0");
        let errors: Vec<String> = [
            ("all_comics_url", self.all_comics_url.as_str()),
            ("newest_comics_url", self.newest_comics_url.as_str()),
            ("host_table_url", self.host_table_url.as_str()),
            ("comic_detail_url", detail_sample.as_str()),
        ]
        .into_iter()
        .filter_map(|(field, value)| {
            Url::parse(value)
                .err()
                .map(|e| format!("source.{} is not a valid URL ({}): {}", field, value, e))
        })
        .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Deserialize)]
struct EpisodeDetail {
    #[serde(default)]
    pages: Vec<String>,
}

/// Catalog source backed by JSON endpoints
#[derive(Debug, Clone)]
pub struct JsonCatalogSource {
    client: Client,
    config: SourceConfig,
}

impl JsonCatalogSource {
    pub fn new(config: SourceConfig, client: Client) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> SourceResult<T> {
        let parsed = Url::parse(url).map_err(|e| SourceError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        debug!("Received {} bytes from {}", body.len(), url);
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl CatalogSource for JsonCatalogSource {
    async fn fetch_all_comics(&self) -> SourceResult<Vec<Comic>> {
        self.get_json(&self.config.all_comics_url).await
    }

    async fn fetch_newest_comics(&self) -> SourceResult<Vec<Comic>> {
        self.get_json(&self.config.newest_comics_url).await
    }

    async fn fetch_host_table(&self) -> SourceResult<HostTable> {
        self.get_json(&self.config.host_table_url).await
    }

    async fn fetch_episode_detail(&self, mut episode: Episode) -> SourceResult<Episode> {
        let detail: EpisodeDetail = self.get_json(&episode.url).await?;
        episode.pages = detail.pages;
        Ok(episode)
    }

    fn comic_detail_url(&self, comic_id: &str) -> String {
        self.config.comic_detail_url.replace(ID_PLACEHOLDER, comic_id)
    }
}
