//! Byte fetching for the loader.
//!
//! `ImageFetcher` abstracts the network call for testability.
//! `HttpFetcher` makes actual HTTP requests.
//! Tests substitute counting/stub fetchers.

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use std::time::Duration;
use url::Url;

use crate::config::FetchConfig;
use crate::error::{ImgcacheError, Result};

/// Abstracts "give me the raw bytes behind this URL".
///
/// The loader awaits this exactly once per in-flight key. Implementations
/// must be safe to call concurrently for different keys.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetch the raw payload for `url`.
    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>>;
}

/// HTTP fetcher backed by a shared reqwest client.
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: String,
    max_bytes: usize,
}

impl HttpFetcher {
    /// Build a fetcher from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed
    /// (TLS backend initialization, mostly).
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
        })
    }
}

#[async_trait]
impl ImageFetcher for HttpFetcher {
    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImgcacheError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let bytes = response.bytes().await?;
        if bytes.len() > self.max_bytes {
            return Err(ImgcacheError::TooLarge {
                size: bytes.len(),
                max: self.max_bytes,
            });
        }
        Ok(bytes.to_vec())
    }
}
