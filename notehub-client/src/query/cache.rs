//! Keyed cache of list results with in-flight coalescing and coarse
//! invalidation.
//!
//! Any successful mutation drops every cached page regardless of key:
//! remote-side ordering and pagination shift after a create or delete, so
//! correctness wins over cache efficiency. The cache is an explicit object
//! scoped to a session, never a hidden singleton, so tests get isolation
//! from fresh instances.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use tokio::sync::OnceCell;

use super::QueryKey;
use crate::api::NotePage;
use crate::error::ApiError;

/// One cached page plus the moment it was fetched. No staleness policy is
/// enforced beyond process lifetime; the timestamp is there for observers.
#[derive(Debug, Clone)]
struct CachedPage {
    page: Arc<NotePage>,
    fetched_at: Instant,
}

type Slot = Arc<OnceCell<CachedPage>>;

#[derive(Default)]
pub struct QueryCache {
    entries: DashMap<QueryKey, Slot>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached page for `key`, running `loader` at most once to
    /// fill it. Concurrent callers for the same key wait on the same
    /// in-flight load and observe the same resolution. Failed loads are not
    /// cached; the next call re-attempts.
    pub async fn fetch<F, Fut>(&self, key: &QueryKey, loader: F) -> Result<Arc<NotePage>, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<NotePage, ApiError>>,
    {
        // Clone the slot out of the map so a concurrent invalidate_all()
        // cannot observe a half-written entry. A load that resolves after
        // its slot was dropped from the map fills only the detached slot.
        let slot = self.entries.entry(key.clone()).or_default().clone();

        let cached = slot
            .get_or_try_init(|| async {
                log::debug!("[QUERY_CACHE] miss for {:?}", key);
                let page = loader().await?;
                Ok::<_, ApiError>(CachedPage {
                    page: Arc::new(page),
                    fetched_at: Instant::now(),
                })
            })
            .await?;

        Ok(cached.page.clone())
    }

    /// Read a cached page without triggering a load.
    pub fn peek(&self, key: &QueryKey) -> Option<Arc<NotePage>> {
        self.entries
            .get(key)
            .and_then(|slot| slot.get().map(|c| c.page.clone()))
    }

    /// When the page for `key` was fetched, if it is cached.
    pub fn fetched_at(&self, key: &QueryKey) -> Option<Instant> {
        self.entries
            .get(key)
            .and_then(|slot| slot.get().map(|c| c.fetched_at))
    }

    /// Drop every cached entry regardless of key.
    pub fn invalidate_all(&self) {
        let dropped = self.entries.len();
        self.entries.clear();
        log::debug!("[QUERY_CACHE] invalidated {} entries", dropped);
    }

    /// Number of resolved entries currently cached.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
