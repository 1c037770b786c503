// Caching decorator for any reading repository
use crate::application::reading_repository::ReadingRepository;
use crate::domain::reading::Reading;
use crate::infrastructure::config::CachePolicy;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Instant;

struct CacheEntry {
    loaded_at: Instant,
    readings: Arc<Vec<Reading>>,
}

/// Serves the last loaded batch until it is older than the policy TTL.
/// Failed loads are never cached.
pub struct CachedReadingRepository {
    inner: Arc<dyn ReadingRepository>,
    policy: CachePolicy,
    entry: RwLock<Option<CacheEntry>>,
}

impl CachedReadingRepository {
    pub fn new(inner: Arc<dyn ReadingRepository>, policy: CachePolicy) -> Self {
        Self {
            inner,
            policy,
            entry: RwLock::new(None),
        }
    }

    fn fresh(&self, entry: &Option<CacheEntry>) -> Option<Arc<Vec<Reading>>> {
        entry
            .as_ref()
            .filter(|e| self.policy.is_fresh(e.loaded_at.elapsed()))
            .map(|e| e.readings.clone())
    }
}

#[async_trait]
impl ReadingRepository for CachedReadingRepository {
    async fn load_readings(&self) -> Result<Arc<Vec<Reading>>> {
        if let Some(readings) = self.fresh(&*self.entry.read().await) {
            tracing::debug!("Serving {} cached battery readings", readings.len());
            return Ok(readings);
        }

        let mut entry = self.entry.write().await;
        // Another caller may have refreshed while we waited for the lock
        if let Some(readings) = self.fresh(&entry) {
            return Ok(readings);
        }

        tracing::debug!("Battery reading cache is empty or stale, reloading");
        let readings = self.inner.load_readings().await?;
        *entry = Some(CacheEntry {
            loaded_at: Instant::now(),
            readings: readings.clone(),
        });
        Ok(readings)
    }
}
