//! In-memory backends for tests.
//!
//! Enabled with the `test-helpers` feature. [`MockBackend`] records every call
//! so tests can assert on how the cache engine talks to its store, and can be
//! switched into slow or failing modes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use crate::{Backend, BackendError, BackendResult, CacheKey, SetOptions};

/// Call counters shared between clones of a [`MockBackend`].
#[derive(Debug, Default)]
pub struct BackendCounters {
    /// Number of `get` calls.
    pub get_count: AtomicUsize,
    /// Number of `set` calls.
    pub set_count: AtomicUsize,
    /// Number of `get` calls per key.
    pub gets_by_key: DashMap<CacheKey, usize>,
}

impl BackendCounters {
    /// Total `get` calls.
    pub fn get_count(&self) -> usize {
        self.get_count.load(Ordering::SeqCst)
    }

    /// Total `set` calls.
    pub fn set_count(&self) -> usize {
        self.set_count.load(Ordering::SeqCst)
    }
}

/// Recording in-memory backend.
///
/// Cheap to clone; clones share storage and counters.
#[derive(Clone, Debug, Default)]
pub struct MockBackend {
    /// Stored values with the options they were written with.
    pub store: Arc<DashMap<CacheKey, (Bytes, SetOptions)>>,
    /// Call counters.
    pub counters: Arc<BackendCounters>,
    write_delay: Option<Duration>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MockBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every `set` by `delay` before the value lands.
    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = Some(delay);
        self
    }

    /// Makes every `get` fail with a connection error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every `set` fail with a connection error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Inserts a value directly, bypassing counters.
    pub fn insert(&self, key: &str, value: impl Into<Bytes>) {
        if let Some(key) = CacheKey::new(key) {
            self.store
                .insert(key, (value.into(), SetOptions::default()));
        }
    }

    /// Returns the stored value for `key`.
    pub fn value(&self, key: &str) -> Option<Bytes> {
        let key = CacheKey::new(key)?;
        self.store.get(&key).map(|entry| entry.0.clone())
    }

    /// Returns the options `key` was last written with.
    pub fn options(&self, key: &str) -> Option<SetOptions> {
        let key = CacheKey::new(key)?;
        self.store.get(&key).map(|entry| entry.1)
    }

    /// Total `get` calls.
    pub fn get_count(&self) -> usize {
        self.counters.get_count()
    }

    /// Total `set` calls.
    pub fn set_count(&self) -> usize {
        self.counters.set_count()
    }

    /// `get` calls issued for `key`.
    pub fn gets_for(&self, key: &str) -> usize {
        CacheKey::new(key)
            .and_then(|key| self.counters.gets_by_key.get(&key).map(|count| *count))
            .unwrap_or(0)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

fn simulated(operation: &str) -> BackendError {
    BackendError::ConnectionError(Box::new(std::io::Error::other(format!(
        "simulated {operation} failure"
    ))))
}

#[async_trait]
impl Backend for MockBackend {
    async fn get(&self, key: &CacheKey) -> BackendResult<Option<Bytes>> {
        self.counters.get_count.fetch_add(1, Ordering::SeqCst);
        *self.counters.gets_by_key.entry(key.clone()).or_insert(0) += 1;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(simulated("read"));
        }
        Ok(self.store.get(key).map(|entry| entry.0.clone()))
    }

    async fn set(&self, key: &CacheKey, value: Bytes, options: SetOptions) -> BackendResult<()> {
        self.counters.set_count.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(simulated("write"));
        }
        self.store.insert(key.clone(), (value, options));
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
