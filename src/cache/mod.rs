//! In-memory image caching with bounded capacity and LRU eviction.

pub mod bounded;

pub use bounded::BoundedCache;
