//! Ad-hoc page retrieval with rate limiting
//!
//! Used for documents outside the structured catalog fetch, such as a comic's
//! detail page. Failures are returned to the caller as they happen; there is
//! no retry here.

use std::num::NonZeroU32;
use std::time::Duration;

use encoding_rs::{Encoding, UTF_8};
use governor::{clock::DefaultClock, state::InMemoryState, Jitter, Quota, RateLimiter};
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::config::ClientConfig;
use crate::constants::http;
use crate::errors::{TransportError, TransportResult};

type DirectRateLimiter = RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>;

/// Rate-limited GET fetcher for HTML and text documents
#[derive(Debug)]
pub struct HttpFetcher {
    client: Client,
    rate_limiter: DirectRateLimiter,
}

impl HttpFetcher {
    /// Build a fetcher from configuration
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the client cannot be built or the rate
    /// limit is zero
    pub fn new(config: &ClientConfig) -> TransportResult<Self> {
        let client = config.build_http_client()?;
        Self::with_client(client, config.rate_limit_rps)
    }

    /// Build a fetcher around an existing client
    pub fn with_client(client: Client, rate_limit_rps: u32) -> TransportResult<Self> {
        let rate_limiter = Self::build_rate_limiter(rate_limit_rps)?;
        Ok(Self {
            client,
            rate_limiter,
        })
    }

    fn build_rate_limiter(rate_limit_rps: u32) -> TransportResult<DirectRateLimiter> {
        let quota = Quota::per_second(NonZeroU32::new(rate_limit_rps).ok_or_else(|| {
            TransportError::RateLimiterConfig {
                reason: "Rate limit must be non-zero".to_string(),
            }
        })?);
        Ok(RateLimiter::direct(quota))
    }

    /// GET `url` and decode the body with `charset`
    ///
    /// The body is always decoded with `charset`, whatever the server's
    /// `Content-Type` claims. An empty or unknown label means UTF-8.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` on an unparsable URL, a connection or body
    /// read failure, or a non-success status
    pub async fn get_text(&self, url: &str, charset: &str) -> TransportResult<String> {
        let url = Url::parse(url).map_err(|e| TransportError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let charset = if charset.is_empty() {
            http::DEFAULT_CHARSET
        } else {
            charset
        };

        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(100)))
            .await;

        let response = self
            .client
            .get(url.as_str())
            .header(ACCEPT, http::ACCEPT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        debug!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(decode_body(&bytes, charset))
    }
}

/// Decode a response body with an explicit charset label
fn decode_body(bytes: &[u8], charset: &str) -> String {
    let encoding = Encoding::for_label(charset.trim().as_bytes()).unwrap_or(UTF_8);
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!("Body contained bytes invalid for {}", encoding.name());
    }
    text.into_owned()
}
