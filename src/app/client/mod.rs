//! HTTP plumbing
//!
//! - `config`: client configuration shared by the page fetcher and the JSON
//!   catalog source
//! - `http`: the rate-limited [`HttpFetcher`] used for ad-hoc page retrieval

pub mod config;
pub mod http;

pub use config::ClientConfig;
pub use http::HttpFetcher;
