//! HTTP client configuration and building logic

use std::time::Duration;

use reqwest::{redirect, Client};
use serde::{Deserialize, Serialize};

use crate::constants::http;
use crate::errors::{TransportError, TransportResult};

/// Settings shared by the page fetcher and the JSON catalog source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Connect timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// Follow HTTP redirects
    pub follow_redirects: bool,
    /// Redirect hop limit when following
    pub max_redirects: usize,
    /// Rate limit for page requests (requests per second)
    pub rate_limit_rps: u32,
    /// User agent sent with every request
    pub user_agent: String,
    /// TCP nodelay (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            follow_redirects: true,
            max_redirects: http::MAX_REDIRECTS,
            rate_limit_rps: http::DEFAULT_RATE_LIMIT_RPS,
            user_agent: http::USER_AGENT.to_string(),
            tcp_nodelay: true,
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client with the specified configuration
    ///
    /// Compressed responses (gzip, deflate, brotli) are negotiated and
    /// decoded by reqwest itself.
    pub fn build_http_client(&self) -> TransportResult<Client> {
        let policy = if self.follow_redirects {
            redirect::Policy::limited(self.max_redirects)
        } else {
            redirect::Policy::none()
        };

        Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(self.user_agent.as_str())
            .redirect(policy)
            .tcp_nodelay(self.tcp_nodelay)
            .build()
            .map_err(TransportError::Http)
    }
}
