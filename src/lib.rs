//! Bounded LRU cache and coalescing loader for remote images.
//!
//! Two pieces:
//!
//! - [`BoundedCache`] — a fixed-capacity map with least-recently-used
//!   eviction. No network, no locking; a plain data structure.
//! - [`ImageLoader`] — resolves a URL to a decoded image through the cache,
//!   and on a miss guarantees at most one fetch per URL is in flight at a
//!   time. Concurrent requests for the same URL coalesce onto the pending
//!   fetch and are each notified exactly once when it resolves.
//!
//! Failures (network or decode) surface to callers as a plain `None`; they
//! are never cached, so a later request retries the fetch.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use imgcache::{FetchConfig, HttpFetcher, ImageLoader, LoaderConfig, Url};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = Arc::new(HttpFetcher::new(&FetchConfig::default())?);
//!     let loader = ImageLoader::new(LoaderConfig::default(), fetcher);
//!
//!     let url = Url::parse("https://example.com/sprite.png")?;
//!     loader.request(url, |img| match img {
//!         Some(img) => println!("decoded {}x{}", img.width(), img.height()),
//!         None => println!("no image"),
//!     });
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod decode;
pub mod error;
pub mod fetch;
pub mod loader;

pub use cache::BoundedCache;
pub use config::{CallbackDispatch, FetchConfig, LoaderConfig};
pub use decode::decode_image;
pub use error::{ImgcacheError, Result};
pub use fetch::{HttpFetcher, ImageFetcher};
pub use loader::{Image, ImageLoader, LoaderStats};

// Resource keys are URLs; re-exported so embedders don't need a direct
// `url` dependency just to build keys.
pub use url::Url;
