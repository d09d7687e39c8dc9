use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Trait for a document body cache.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Returns the cached body if it is still fresh.
    async fn get(&self, key: &str) -> Option<String>;
    /// Stores `body` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, body: String);
    async fn contains_key(&self, key: &str) -> bool;
    async fn clear(&self);
    async fn len(&self) -> usize;
}

#[derive(Debug, Clone)]
struct CacheEntry {
    body: String,
    fetched_at: Instant,
}

/// In-memory cache whose entries expire `ttl` after they were stored.
///
/// Expired entries are dropped lazily, the next time they are looked up.
/// With no ttl the entries live for the whole process.
#[derive(Debug, Clone)]
pub struct TtlCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    ttl: Option<Duration>,
}

impl TtlCache {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        match self.ttl {
            Some(ttl) => entry.fetched_at.elapsed() < ttl,
            None => true,
        }
    }

    /// Removes `key` if it is still stale once the write lock is held.
    async fn evict_if_stale(&self, key: &str) {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(key) {
            if !self.is_fresh(entry) {
                entries.remove(key);
                tracing::debug!("Evicted stale cache entry for '{}'", key);
            }
        }
    }
}

#[async_trait]
impl Cache for TtlCache {
    async fn get(&self, key: &str) -> Option<String> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if self.is_fresh(entry) => return Some(entry.body.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        self.evict_if_stale(key).await;
        None
    }

    async fn set(&self, key: &str, body: String) {
        let entry = CacheEntry {
            body,
            fetched_at: Instant::now(),
        };
        self.entries.write().await.insert(key.to_string(), entry);
    }

    async fn contains_key(&self, key: &str) -> bool {
        let entries = self.entries.read().await;
        entries.get(key).is_some_and(|entry| self.is_fresh(entry))
    }

    async fn clear(&self) {
        self.entries.write().await.clear();
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
