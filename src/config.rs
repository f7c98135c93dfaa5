//! Loader and fetcher configuration.
//!
//! All structs deserialize with `#[serde(default)]` so embedders can load
//! partial config files and inherit the rest.

use serde::{Deserialize, Serialize};

/// Default cache capacity (entries).
const DEFAULT_MAX_ITEMS: usize = 20;

/// Default HTTP request timeout (seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default maximum accepted payload size (20 MiB).
const DEFAULT_MAX_BYTES: usize = 20 * 1024 * 1024;

/// Where a waiter's callback runs once its fetch resolves.
///
/// The loader guarantees exactly-once delivery; *which* task delivers is an
/// embedding policy, not a loader invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CallbackDispatch {
    /// Invoke callbacks directly on the resolving task (or on the calling
    /// task for cache hits). Cheapest; callbacks must be quick.
    #[default]
    Inline,
    /// Deliver each batch of callbacks on its own spawned tokio task,
    /// still in registration order. Use when callbacks do real work or
    /// must not run on the fetch task.
    Spawned,
}

/// Configuration for [`ImageLoader`](crate::loader::ImageLoader).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Maximum number of decoded images held in the cache.
    /// Clamped to a minimum of 1.
    pub max_items: usize,
    /// Callback delivery policy.
    pub dispatch: CallbackDispatch,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            dispatch: CallbackDispatch::Inline,
        }
    }
}

/// Configuration for [`HttpFetcher`](crate::fetch::HttpFetcher).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Responses larger than this are rejected without decoding.
    pub max_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("imgcache/{}", env!("CARGO_PKG_VERSION")),
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}
