//! Latest-wins keyword search
//!
//! - `config`: poll interval settings
//! - `state`: the one-request mailbox, observable state and counters
//! - `core`: the [`SearchLoop`] task
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use comic_catalog::app::catalog::CatalogStore;
//! use comic_catalog::app::search::{SearchConfig, SearchLoop};
//!
//! # async fn example() {
//! let store = Arc::new(CatalogStore::new());
//! let search = SearchLoop::start(store, SearchConfig::default());
//!
//! // Each keystroke submits; only the latest pending search runs
//! search.search("O", |_| {}).ok();
//! search.search("On", |_| {}).ok();
//! let matches = search.search_latest("One").await;
//! # let _ = matches;
//! search.shutdown().await;
//! # }
//! ```

pub mod config;
pub mod core;
pub mod state;

pub use self::config::SearchConfig;
pub use self::core::SearchLoop;
pub use self::state::{SearchCallback, SearchState, SearchStats};
