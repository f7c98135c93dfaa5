//! Crate-wide error type and `Result` alias.
//!
//! The loader collapses every variant into a single "no image" outcome for
//! its callers; these types surface only at the fetcher/decoder boundary and
//! in logs.

use thiserror::Error;

/// Errors produced while fetching or decoding a remote image.
#[derive(Debug, Error)]
pub enum ImgcacheError {
    /// Network or transport failure from the HTTP client.
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The server answered, but not with a usable payload.
    #[error("fetch failed for '{url}': HTTP {status}")]
    Http { status: u16, url: String },

    /// Payload exceeds the configured size ceiling.
    #[error("payload of {size} bytes exceeds the maximum of {max} bytes")]
    TooLarge { size: usize, max: usize },

    /// Payload bytes are not a decodable image.
    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ImgcacheError>;
