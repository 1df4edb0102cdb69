//! Moka backend implementation.

use async_trait::async_trait;
use bytes::Bytes;
use cachet_backend::{Backend, BackendResult, CacheKey, SetOptions};
use moka::future::Cache;
use tracing::trace;

use crate::builder::{MokaBackendBuilder, NoCapacity};

/// Value stored in Moka together with its requested lifetime.
#[derive(Clone, Debug)]
pub(crate) struct Entry {
    pub(crate) data: Bytes,
    pub(crate) options: SetOptions,
}

/// In-memory cache backend powered by Moka.
///
/// `MokaBackend` provides a concurrent in-memory cache with per-entry
/// expiration taken from [`SetOptions::expires`].
///
/// # Caveats
///
/// - Data is **not persisted**; the cache is lost on process restart
/// - Data is **not shared** across processes; use Redis for distributed caching
/// - Expiration is **best-effort**; expired entries may briefly remain in
///   memory until Moka's maintenance runs, but are never returned by `get`
#[derive(Clone)]
pub struct MokaBackend {
    pub(crate) cache: Cache<CacheKey, Entry>,
    pub(crate) label: String,
}

impl std::fmt::Debug for MokaBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaBackend")
            .field("label", &self.label)
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl MokaBackend {
    /// Creates a new builder for `MokaBackend`.
    ///
    /// Capacity must be configured with
    /// [`max_entries`](MokaBackendBuilder::max_entries) before `build()`.
    pub fn builder() -> MokaBackendBuilder<NoCapacity> {
        MokaBackendBuilder::new()
    }

    /// Runs pending maintenance (expiration, eviction) immediately.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }

    /// Approximate number of live entries.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl Backend for MokaBackend {
    async fn get(&self, key: &CacheKey) -> BackendResult<Option<Bytes>> {
        let value = self.cache.get(key).await.map(|entry| entry.data);
        trace!(%key, found = value.is_some(), "moka get");
        Ok(value)
    }

    async fn set(&self, key: &CacheKey, value: Bytes, options: SetOptions) -> BackendResult<()> {
        trace!(%key, ttl = ?options.expires, "moka set");
        self.cache
            .insert(key.clone(), Entry { data: value, options })
            .await;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.label
    }
}
