//! Configuration management for the comic catalog
//!
//! Settings live in one TOML file with a section per component. Every field
//! has a default, so an absent file or an empty section is valid.
//!
//! Lookup order: an explicit `--config` path, the `COMIC_CATALOG_CONFIG`
//! environment variable, `./comic-catalog.toml`, then the user config
//! directory (`<config_dir>/comic-catalog/config.toml`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::client::ClientConfig;
use crate::app::controller::CatalogConfig;
use crate::app::loader::LoaderConfig;
use crate::app::pool::{ConfigPresets, TaskPoolConfig};
use crate::app::search::SearchConfig;
use crate::app::source::SourceConfig;
use crate::constants::{config as files, env as env_constants, http, pools};
use crate::errors::{ConfigError, ConfigResult};

/// Log levels accepted in `[logging].level`
const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General task pool
    pub pool: TaskPoolConfig,
    /// Search loop
    pub search: SearchConfig,
    /// Initial load barrier
    pub loader: LoaderConfig,
    /// HTTP client
    pub client: ClientConfig,
    /// Catalog endpoints
    pub source: SourceConfig,
    /// Logging
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pool: ConfigPresets::general(),
            search: SearchConfig::default(),
            loader: LoaderConfig::default(),
            client: ClientConfig::default(),
            source: SourceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level when neither CLI flags nor `RUST_LOG` set one
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Split into the controller settings and the source endpoints
    pub fn to_runtime_config(&self) -> (CatalogConfig, SourceConfig) {
        (
            CatalogConfig {
                tasks: self.pool.clone(),
                search: self.search.clone(),
                loader: self.loader.clone(),
                client: self.client.clone(),
            },
            self.source.clone(),
        )
    }

    /// Load configuration from the first location that has a file
    ///
    /// # Errors
    ///
    /// `ConfigError::NotFound` if an explicitly named file (flag or
    /// environment variable) does not exist; read and parse failures
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let explicit = config_file_override.or_else(|| {
            std::env::var_os(env_constants::CONFIG_PATH)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        });

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound { path });
            }
            return Self::load_from_file(&path).await;
        }

        match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path).await,
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse a TOML document
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every section and collect all problems
    ///
    /// # Errors
    ///
    /// `ConfigError::ValidationFailed` listing each violation
    pub fn validate(&self) -> ConfigResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.pool.validate() {
            errors.push(format!("pool: {}", e));
        }
        if let Err(e) = self.search.validate() {
            errors.push(format!("search: {}", e));
        }
        if let Err(e) = self.loader.validate() {
            errors.push(format!("loader: {}", e));
        }
        if self.client.rate_limit_rps == 0 {
            errors.push("client: rate_limit_rps must be at least 1".to_string());
        }
        if self.client.request_timeout.is_zero() {
            errors.push("client: request_timeout cannot be zero".to_string());
        }
        if let Err(source_errors) = self.source.validate() {
            errors.extend(source_errors);
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            errors.push(format!(
                "logging: unknown level '{}' (expected one of {})",
                self.logging.level,
                LOG_LEVELS.join(", ")
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::ValidationFailed { errors })
        }
    }

    /// Write a commented default configuration file
    ///
    /// Without `path` the file goes to the user config directory. An existing
    /// file is left alone unless `force` is set. Returns the path and whether
    /// a file was written.
    pub async fn init(path: Option<PathBuf>, force: bool) -> ConfigResult<(PathBuf, bool)> {
        let path = match path {
            Some(path) => path,
            None => Self::default_config_path()?,
        };

        if path.exists() && !force {
            return Ok((path, false));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&path, Self::generate_default_config_content())
            .await
            .map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;

        info!("Wrote default configuration to {}", path.display());
        Ok((path, true))
    }

    /// Default config file path for the current user
    pub fn default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join(files::APP_DIR_NAME).join(files::FILE_NAME))
    }

    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(files::LOCAL_FILE_NAME)];
        if let Ok(user) = Self::default_config_path() {
            search_paths.push(user);
        }

        let found = search_paths.into_iter().find(|path| path.exists());
        if let Some(path) = &found {
            debug!("Found config file: {}", path.display());
        }
        found
    }

    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let config = Self::from_toml(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Default configuration with comments
    pub fn generate_default_config_content() -> String {
        let source = SourceConfig::default();
        format!(
            r#"# Comic catalog configuration
# Every setting is optional; missing values fall back to these defaults.
# Durations accept values such as "500ms", "30s" or "1m".

[pool]
# Workers in the general task pool
worker_count = {workers}
# How long shutdown waits for queued tasks
shutdown_timeout = "10s"

[search]
# Safety-net re-check interval of the search loop
poll_interval = "500ms"

[loader]
# Upper bound on each of the three initial fetches
fetch_timeout = "30s"

[client]
request_timeout = "1m"
connect_timeout = "30s"
follow_redirects = true
max_redirects = {redirects}
# Page requests per second
rate_limit_rps = {rps}
tcp_nodelay = true

[source]
all_comics_url = "{all}"
newest_comics_url = "{newest}"
host_table_url = "{hosts}"
# "{{id}}" is replaced by the comic id
comic_detail_url = "{detail}"

[logging]
level = "info"  # error, warn, info, debug, trace
"#,
            workers = pools::DEFAULT_TASK_WORKERS,
            redirects = http::MAX_REDIRECTS,
            rps = http::DEFAULT_RATE_LIMIT_RPS,
            all = source.all_comics_url,
            newest = source.newest_comics_url,
            hosts = source.host_table_url,
            detail = source.comic_detail_url,
        )
    }
}
