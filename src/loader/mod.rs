//! Coalescing image loader.
//!
//! [`ImageLoader`] resolves a URL to a decoded image by consulting its
//! bounded cache first and, on a miss, making sure at most one fetch per URL
//! is in flight at any time. Every request that arrives while a fetch is
//! pending is queued as a waiter and notified exactly once when the fetch
//! resolves, in registration order.
//!
//! # Locking
//!
//! One `std::sync::Mutex` guards the cache, the in-flight map, and the
//! counters together: "is it cached?" and "is a fetch pending?" have to be
//! answered atomically or two racing misses would both start a fetch. The
//! lock is never held across an `.await` and never held while callbacks run,
//! so callbacks may freely call [`request`](ImageLoader::request) again.
//!
//! # Late callers
//!
//! There is no cancellation. A caller that stops caring (a recycled list
//! row, say) still gets its callback and must discard it by checking the key
//! itself.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};
use url::Url;

use crate::cache::BoundedCache;
use crate::config::{CallbackDispatch, LoaderConfig};
use crate::decode::decode_image;
use crate::fetch::ImageFetcher;

/// A decoded image, shared between the cache entry and every waiter it is
/// delivered to.
pub type Image = Arc<image::DynamicImage>;

/// Completion callback: receives the decoded image, or `None` when the
/// fetch failed or the payload would not decode.
pub type Callback = Box<dyn FnOnce(Option<Image>) + Send + 'static>;

/// Counters for observing loader behavior. Snapshot via
/// [`ImageLoader::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoaderStats {
    /// Requests answered straight from the cache.
    pub hits: u64,
    /// Requests that found no cache entry.
    pub misses: u64,
    /// Misses that joined an already-pending fetch instead of starting one.
    pub coalesced: u64,
    /// Fetches started.
    pub fetches: u64,
    /// Fetches that resolved to absence (network or decode failure).
    pub failures: u64,
}

/// Everything the loader mutates, behind one lock.
struct LoaderState {
    cache: BoundedCache<Url, Image>,
    in_flight: HashMap<Url, Vec<Callback>>,
    stats: LoaderStats,
}

/// Where a freshly admitted request landed.
enum Admission {
    /// Cache hit; the callback is handed back for delivery outside the lock.
    Hit(Image, Callback),
    /// Appended to an existing in-flight fetch's waiter list.
    Joined,
    /// First waiter for this URL; the caller must start the fetch.
    First,
}

struct Inner {
    state: Mutex<LoaderState>,
    fetcher: Arc<dyn ImageFetcher>,
    dispatch: CallbackDispatch,
}

/// Cache-fronted loader that deduplicates concurrent fetches per URL.
///
/// Construct one per application (or per test) and hand out clones; a clone
/// is a cheap handle onto the same cache and in-flight map. There is no
/// global instance.
///
/// [`request`](Self::request) must be called from within a tokio runtime —
/// the underlying fetch runs as a spawned task.
#[derive(Clone)]
pub struct ImageLoader {
    inner: Arc<Inner>,
}

impl ImageLoader {
    /// Create a loader with the given config and fetcher.
    pub fn new(config: LoaderConfig, fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(LoaderState {
                    cache: BoundedCache::new(config.max_items),
                    in_flight: HashMap::new(),
                    stats: LoaderStats::default(),
                }),
                fetcher,
                dispatch: config.dispatch,
            }),
        }
    }

    /// Resolve `url` to an image, invoking `on_complete` exactly once.
    ///
    /// Never blocks for the duration of a fetch: a cache hit delivers
    /// immediately; a miss either joins the pending fetch for `url` or
    /// spawns a new one. With [`CallbackDispatch::Inline`] a hit invokes
    /// `on_complete` synchronously on the calling task.
    pub fn request<F>(&self, url: Url, on_complete: F)
    where
        F: FnOnce(Option<Image>) + Send + 'static,
    {
        match self.inner.admit(&url, Box::new(on_complete)) {
            Admission::Hit(image, cb) => {
                debug!(%url, "cache hit");
                self.inner.deliver(vec![cb], Some(image));
            }
            Admission::Joined => {
                debug!(%url, "joined in-flight fetch");
            }
            Admission::First => {
                debug!(%url, "starting fetch");
                let inner = Arc::clone(&self.inner);
                tokio::spawn(async move { inner.run_fetch(url).await });
            }
        }
    }

    /// Snapshot the loader's counters.
    pub fn stats(&self) -> LoaderStats {
        self.inner
            .state
            .lock()
            .expect("loader state lock poisoned")
            .stats
    }
}

impl Inner {
    /// Classify a request under the lock: hit, join, or first waiter.
    fn admit(&self, url: &Url, cb: Callback) -> Admission {
        let mut guard = self.state.lock().expect("loader state lock poisoned");
        let state = &mut *guard;
        if let Some(image) = state.cache.get(url).cloned() {
            state.stats.hits += 1;
            return Admission::Hit(image, cb);
        }
        state.stats.misses += 1;
        match state.in_flight.entry(url.clone()) {
            Entry::Occupied(mut e) => {
                state.stats.coalesced += 1;
                e.get_mut().push(cb);
                Admission::Joined
            }
            Entry::Vacant(v) => {
                state.stats.fetches += 1;
                v.insert(vec![cb]);
                Admission::First
            }
        }
    }

    /// Drive one fetch to completion and fan the result out.
    async fn run_fetch(&self, url: Url) {
        let image = match self.fetch_and_decode(&url).await {
            Ok(img) => Some(Arc::new(img)),
            Err(e) => {
                warn!(%url, error = %e, "image fetch failed");
                None
            }
        };

        // Store and unregister in one lock acquisition: any request arriving
        // after this either sees the cache entry or, on failure, starts a
        // fresh fetch. It can never attach to the fetch that just finished.
        let waiters = {
            let mut state = self.state.lock().expect("loader state lock poisoned");
            if let Some(img) = &image {
                state.cache.put(url.clone(), Arc::clone(img));
            } else {
                state.stats.failures += 1;
            }
            state.in_flight.remove(&url).unwrap_or_default()
        };

        self.deliver(waiters, image);
    }

    async fn fetch_and_decode(&self, url: &Url) -> crate::error::Result<image::DynamicImage> {
        let bytes = self.fetcher.fetch_bytes(url).await?;
        // Decoding is CPU-bound; keep it off the executor threads.
        tokio::task::spawn_blocking(move || decode_image(&bytes))
            .await
            .expect("decode task panicked")
    }

    /// Invoke waiters in registration order, outside the lock.
    ///
    /// `Spawned` moves the whole batch onto one task: a task per callback
    /// would let the scheduler interleave them and break FIFO order.
    fn deliver(&self, waiters: Vec<Callback>, image: Option<Image>) {
        match self.dispatch {
            CallbackDispatch::Inline => {
                for cb in waiters {
                    cb(image.clone());
                }
            }
            CallbackDispatch::Spawned => {
                tokio::spawn(async move {
                    for cb in waiters {
                        cb(image.clone());
                    }
                });
            }
        }
    }
}
