use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::cache::{Cache, TtlCache};
use crate::catalog::Catalog;
use crate::error::DocError;
use crate::source::DocumentSource;

/// Resolves catalog keys to document text, going through the cache.
///
/// Every read of a document goes through [`Retriever::resolve`]; nothing
/// else reads a source location directly.
pub struct Retriever {
    catalog: Arc<Catalog>,
    cache: Arc<dyn Cache>,
    source: Arc<dyn DocumentSource>,
    /// One lock per catalog key, held while that key is being fetched.
    fetch_locks: HashMap<String, Mutex<()>>,
}

impl Retriever {
    pub fn new(catalog: Arc<Catalog>, cache: Arc<dyn Cache>, source: Arc<dyn DocumentSource>) -> Self {
        let fetch_locks = catalog
            .keys()
            .map(|key| (key.to_string(), Mutex::new(())))
            .collect();
        Self {
            catalog,
            cache,
            source,
            fetch_locks,
        }
    }

    /// Builds a retriever with a [`TtlCache`] using the catalog's ttl.
    pub fn with_ttl_cache(catalog: Arc<Catalog>, source: Arc<dyn DocumentSource>) -> Self {
        let cache = Arc::new(TtlCache::new(catalog.ttl()));
        Self::new(catalog, cache, source)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cache(&self) -> &Arc<dyn Cache> {
        &self.cache
    }

    /// Returns the text for `key`, fetching it only when the cache has no
    /// fresh copy. Failures are returned as-is and never cached.
    pub async fn resolve(&self, key: &str) -> Result<String, DocError> {
        let entry = self.catalog.get(key)?;

        if let Some(body) = self.cache.get(key).await {
            tracing::debug!("Cache hit for '{}'", key);
            return Ok(body);
        }

        let _guard = match self.fetch_locks.get(key) {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        // Another task may have filled the cache while we waited.
        if let Some(body) = self.cache.get(key).await {
            tracing::debug!("Cache filled by concurrent fetch for '{}'", key);
            return Ok(body);
        }

        tracing::info!("Cache miss for '{}'. Fetching {}", key, entry.location);
        let body = self.source.fetch(&entry.location).await?;
        self.cache.set(key, body.clone()).await;
        Ok(body)
    }
}
