use std::sync::Arc;

use arc_swap::ArcSwap;
use log::debug;

use crate::search::Search;

/// A shared holder for the engine a fleet of scanning threads should use.
///
/// Rebuilds happen off to the side: construct a fresh [`Search`] (on any
/// thread), then [`store`](SharedSearch::store) it. The store is a single
/// atomic pointer swap. Readers take a [`snapshot`](SharedSearch::snapshot)
/// at the start of each scan and are never blocked; scans already running on
/// the old engine simply finish on it.
///
/// ```
/// use sensieve::{from_words, SharedSearch};
///
/// let shared = SharedSearch::new(from_words(&["dog"]));
/// assert!(shared.snapshot().has_sens(b"a dog"));
///
/// shared.store(from_words(&["cat"]));
/// assert!(!shared.snapshot().has_sens(b"a dog"));
/// ```
pub struct SharedSearch {
    inner: ArcSwap<Search>,
}

impl SharedSearch {
    pub fn new(search: Search) -> SharedSearch {
        SharedSearch {
            inner: ArcSwap::from_pointee(search),
        }
    }

    /// The engine to use for one scan. The snapshot stays valid (and
    /// unchanged) for as long as the caller holds it, regardless of stores
    /// happening concurrently.
    pub fn snapshot(&self) -> Arc<Search> {
        self.inner.load_full()
    }

    /// Publish a freshly built engine.
    pub fn store(&self, search: Search) {
        debug!(
            "swapping in rebuilt dictionary: {} terms",
            search.size()
        );
        self.inner.store(Arc::new(search));
    }
}
