//! Simple in-memory test backend implementation using DashMap.

use async_trait::async_trait;
use bytes::Bytes;
use cachet_backend::{Backend, BackendError, BackendResult, CacheKey, SetOptions};
use dashmap::DashMap;
use std::sync::Arc;

/// Simple in-memory backend for testing using DashMap.
///
/// This backend is thread-safe and can be cloned cheaply (Arc internally).
#[derive(Clone, Default)]
pub struct TestBackend {
    store: Arc<DashMap<CacheKey, (Bytes, SetOptions)>>,
}

impl TestBackend {
    /// Create a new empty test backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options the key was last written with.
    pub fn options(&self, key: &CacheKey) -> Option<SetOptions> {
        self.store.get(key).map(|entry| entry.1)
    }
}

#[async_trait]
impl Backend for TestBackend {
    async fn get(&self, key: &CacheKey) -> BackendResult<Option<Bytes>> {
        Ok(self.store.get(key).map(|entry| entry.0.clone()))
    }

    async fn set(&self, key: &CacheKey, value: Bytes, options: SetOptions) -> BackendResult<()> {
        self.store.insert(key.clone(), (value, options));
        Ok(())
    }

    fn name(&self) -> &str {
        "test"
    }
}

/// Backend that always returns errors (for error testing).
#[derive(Clone, Default)]
pub struct ErrorBackend;

#[async_trait]
impl Backend for ErrorBackend {
    async fn get(&self, _key: &CacheKey) -> BackendResult<Option<Bytes>> {
        Err(BackendError::InternalError(Box::new(
            std::io::Error::other("simulated error"),
        )))
    }

    async fn set(&self, _key: &CacheKey, _value: Bytes, _options: SetOptions) -> BackendResult<()> {
        Err(BackendError::InternalError(Box::new(
            std::io::Error::other("simulated error"),
        )))
    }

    fn name(&self) -> &str {
        "error"
    }
}
