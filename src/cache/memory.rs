use crate::cache::CacheStats;
use crate::error::{AppError, Result};
use crate::models::PhotoSpot;
use moka::future::Cache;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// In-memory photo-spot cache keyed by coarse location.
///
/// Entries never expire and are never evicted; they live until
/// [`clear`](Self::clear). Concurrent loads of the same key are merged into a
/// single call of the loader. Failed loads are not cached.
pub struct PhotoSpotCache {
    spots: Cache<String, Arc<Vec<PhotoSpot>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PhotoSpotCache {
    pub fn new() -> Self {
        PhotoSpotCache {
            spots: Cache::builder().build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    #[cfg(test)]
    pub async fn get(&self, key: &str) -> Option<Arc<Vec<PhotoSpot>>> {
        self.spots.get(key).await
    }

    #[cfg(test)]
    pub async fn insert(&self, key: &str, spots: Vec<PhotoSpot>) {
        self.spots.insert(key.to_string(), Arc::new(spots)).await;
    }

    /// Return the cached spots for `key`, running `load` only if absent
    pub async fn get_or_load<F, Fut>(&self, key: &str, load: F) -> Result<Arc<Vec<PhotoSpot>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<PhotoSpot>>>,
    {
        let loaded = AtomicBool::new(false);
        let result = self
            .spots
            .try_get_with(key.to_string(), async {
                loaded.store(true, Ordering::Relaxed);
                load().await.map(Arc::new)
            })
            .await
            .map_err(|e: Arc<AppError>| (*e).clone());

        if loaded.load(Ordering::Relaxed) {
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Photo spot cache miss: {}", key);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Photo spot cache hit: {}", key);
        }

        result
    }

    /// Drop every entry. Takes effect immediately for subsequent lookups.
    pub fn clear(&self) {
        self.spots.invalidate_all();
        tracing::info!("Photo spot cache cleared");
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let hit_rate = if hits + misses > 0 {
            (hits as f64 / (hits + misses) as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            hits,
            misses,
            hit_rate,
            entries: self.spots.entry_count(),
        }
    }
}

impl Default for PhotoSpotCache {
    fn default() -> Self {
        Self::new()
    }
}
