//! Application constants for the comic catalog
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain.

use std::time::Duration;

/// Environment variable names
pub mod env {
    /// Overrides the configuration file location
    pub const CONFIG_PATH: &str = "COMIC_CATALOG_CONFIG";
}

/// Task pool sizing
pub mod pools {
    /// Workers in the general-purpose task pool
    pub const DEFAULT_TASK_WORKERS: usize = 10;

    /// Workers in the order-preserving pool
    pub const SEQUENTIAL_WORKERS: usize = 1;

    /// Upper bound accepted by configuration validation
    pub const MAX_TASK_WORKERS: usize = 64;

    /// Name of the general-purpose pool in logs
    pub const TASK_POOL_NAME: &str = "tasks";

    /// Name of the order-preserving pool in logs
    pub const SEQUENTIAL_POOL_NAME: &str = "fifo";
}

/// Search coalescing loop
pub mod search {
    use super::Duration;

    /// Liveness re-check interval for the search loop
    pub const POLL_INTERVAL: Duration = Duration::from_millis(500);
}

/// Initial catalog load
pub mod loader {
    use super::Duration;

    /// Number of datasets fetched by the initial load
    pub const DATASET_COUNT: usize = 3;

    /// Upper bound on a single dataset fetch
    pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

    /// Dataset label for the full catalog
    pub const ALL_COMICS: &str = "all comics";

    /// Dataset label for the newest catalog
    pub const NEWEST_COMICS: &str = "newest comics";

    /// Dataset label for the host-routing table
    pub const HOST_TABLE: &str = "host table";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Browser user agent sent with page requests
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/60.0.3112.90 Safari/537.36";

    /// Accept header sent with page requests
    pub const ACCEPT: &str =
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";

    /// Charset used when the caller does not name one
    pub const DEFAULT_CHARSET: &str = "utf-8";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Maximum number of redirects to follow
    pub const MAX_REDIRECTS: usize = 10;

    /// Default rate limit for page requests (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 10;
}

/// Episode URL handling
pub mod episodes {
    /// Scheme prepended to scheme-relative page image URLs
    pub const IMAGE_URL_SCHEME: &str = "https:";
}

/// Configuration file locations
pub mod config {
    /// Project-local configuration file
    pub const LOCAL_FILE_NAME: &str = "comic-catalog.toml";

    /// Directory under the user config dir
    pub const APP_DIR_NAME: &str = "comic-catalog";

    /// File name under the app config dir
    pub const FILE_NAME: &str = "config.toml";
}

// Re-export commonly used constants for convenience
pub use http::USER_AGENT;
pub use pools::{DEFAULT_TASK_WORKERS, SEQUENTIAL_WORKERS};
pub use search::POLL_INTERVAL;
