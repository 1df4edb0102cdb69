use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;

use crate::{BackendError, CacheKey};

/// Result alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Options attached to a single write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Time after which the backend should forget the entry.
    ///
    /// `None` keeps the entry until the backend evicts it on its own.
    pub expires: Option<Duration>,
}

impl SetOptions {
    /// Options with an expiry of `ttl`.
    pub fn expires(ttl: Duration) -> Self {
        Self { expires: Some(ttl) }
    }
}

/// Opaque key-value store holding cached responses.
///
/// Implementations must be safe to share between concurrent requests. The
/// cache engine never retries a failed call; retries and timeouts belong to
/// the backend itself.
#[async_trait]
pub trait Backend: Sync + Send {
    /// Reads the value stored under `key`.
    async fn get(&self, key: &CacheKey) -> BackendResult<Option<Bytes>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &CacheKey, value: Bytes, options: SetOptions) -> BackendResult<()>;

    /// Returns the name of this backend for logs and metrics.
    fn name(&self) -> &str {
        "backend"
    }
}

#[async_trait]
impl Backend for &dyn Backend {
    async fn get(&self, key: &CacheKey) -> BackendResult<Option<Bytes>> {
        (*self).get(key).await
    }

    async fn set(&self, key: &CacheKey, value: Bytes, options: SetOptions) -> BackendResult<()> {
        (*self).set(key, value, options).await
    }

    fn name(&self) -> &str {
        (*self).name()
    }
}

#[async_trait]
impl Backend for Box<dyn Backend> {
    async fn get(&self, key: &CacheKey) -> BackendResult<Option<Bytes>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &CacheKey, value: Bytes, options: SetOptions) -> BackendResult<()> {
        (**self).set(key, value, options).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl Backend for Arc<dyn Backend + Send + 'static> {
    async fn get(&self, key: &CacheKey) -> BackendResult<Option<Bytes>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &CacheKey, value: Bytes, options: SetOptions) -> BackendResult<()> {
        (**self).set(key, value, options).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
