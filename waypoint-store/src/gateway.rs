//! Session-scoped, stale-while-revalidate cache of the trip list.

use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};
use waypoint_shared::CacheEntry;

use crate::source::FetchError;
use crate::storage::{SessionStorage, StorageError};

pub const DEFAULT_CACHE_KEY: &str = "waypoint:trips";

/// What [`CacheGateway::render_with_stale_while_revalidate`] ended up doing.
#[derive(Debug)]
pub enum SwrOutcome {
    /// Cached entry painted; the fresh fetch matched it, so no second paint.
    Unchanged,
    /// Fresh entry stored and painted, after a stale paint if `had_stale`.
    Refreshed { had_stale: bool },
    /// Fetch failed; the stale paint stays on screen.
    StaleRetained,
    /// Fetch failed and nothing was cached. Nothing was painted.
    Unavailable(FetchError),
}

impl SwrOutcome {
    pub fn render_count(&self) -> usize {
        match self {
            SwrOutcome::Unchanged | SwrOutcome::StaleRetained => 1,
            SwrOutcome::Refreshed { had_stale: true } => 2,
            SwrOutcome::Refreshed { had_stale: false } => 1,
            SwrOutcome::Unavailable(_) => 0,
        }
    }
}

#[derive(Clone)]
pub struct CacheGateway {
    storage: Arc<dyn SessionStorage>,
    key: String,
}

impl CacheGateway {
    pub fn new(storage: Arc<dyn SessionStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The cached entry, if one exists and parses. A corrupt entry is deleted
    /// and reported as absent.
    pub async fn load(&self) -> Option<CacheEntry> {
        let raw = match self.storage.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!("Trip cache read failed, treating as empty: {}", err);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Discarding corrupt trip cache: {}", err);
                if let Err(err) = self.invalidate().await {
                    warn!("Failed to delete corrupt trip cache: {}", err);
                }
                None
            }
        }
    }

    pub async fn store(&self, entry: &CacheEntry) -> Result<(), StorageError> {
        let raw = serde_json::to_string(entry)?;
        self.storage.set(&self.key, &raw).await
    }

    /// Drops the cached entry so the next load goes to the network.
    pub async fn invalidate(&self) -> Result<(), StorageError> {
        self.storage.remove(&self.key).await?;
        debug!("Trip cache invalidated: {}", self.key);
        Ok(())
    }

    /// Paints the cached entry right away, then paints again only if the
    /// fresh fetch brings different content.
    ///
    /// The stale paint always happens before the fetch is awaited, so it
    /// never waits on the network. The fetch itself makes no progress until
    /// it is awaited.
    pub async fn render_with_stale_while_revalidate<F, Fut, R>(
        &self,
        fetch_fresh: F,
        mut render: R,
    ) -> SwrOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CacheEntry, FetchError>>,
        R: FnMut(&CacheEntry),
    {
        let cached = self.load().await;
        let pending = fetch_fresh();

        if let Some(entry) = &cached {
            render(entry);
        }

        match pending.await {
            Ok(fresh) => {
                if cached.as_ref() == Some(&fresh) {
                    debug!("Fresh trip list matches cache, skipping re-render");
                    return SwrOutcome::Unchanged;
                }

                if let Err(err) = self.store(&fresh).await {
                    warn!("Failed to cache trip list: {}", err);
                }
                info!("Rendering fresh trip list ({} trips)", fresh.trips.len());
                render(&fresh);

                SwrOutcome::Refreshed {
                    had_stale: cached.is_some(),
                }
            }
            Err(err) if cached.is_some() => {
                warn!("Trip refresh failed, keeping cached view: {}", err);
                SwrOutcome::StaleRetained
            }
            Err(err) => SwrOutcome::Unavailable(err),
        }
    }

    /// Cached entry if present, otherwise fetch, store and return it.
    pub async fn read_through<F, Fut>(&self, fetch_fresh: F) -> Result<CacheEntry, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CacheEntry, FetchError>>,
    {
        if let Some(entry) = self.load().await {
            return Ok(entry);
        }

        let fresh = fetch_fresh().await?;
        if let Err(err) = self.store(&fresh).await {
            warn!("Failed to cache trip list: {}", err);
        }
        Ok(fresh)
    }
}
