//! Background cache writes with read-your-writes ordering.
//!
//! Captured responses are written to the backend off the request path. Every
//! write is registered with the [`WriteQueue`] before it is spawned, and a
//! lookup first calls [`WriteQueue::drain`], which waits for all writes
//! registered at that moment to settle. A request arriving right after a
//! store therefore observes it, while the response that triggered the store
//! is never delayed by it.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use cachet_backend::{BackendResult, CacheKey};
use dashmap::DashMap;
use futures::{
    FutureExt,
    future::{BoxFuture, Shared, join_all},
};
use tokio::sync::oneshot;
use tracing::{Instrument, debug, info_span, warn};

use crate::metrics;

/// Which half of a cached response a write stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    /// Raw response body under the cache key.
    Body,
    /// Serialized status and headers under the suffixed key.
    Headers,
}

impl WriteKind {
    /// Label used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteKind::Body => "body",
            WriteKind::Headers => "headers",
        }
    }
}

/// Resolves once the write has settled, successfully or not.
type Settled = Shared<BoxFuture<'static, ()>>;

struct WriteQueueInner {
    pending: DashMap<u64, Settled>,
    counter: AtomicU64,
}

/// Set of in-flight backend writes.
///
/// Clones share the same set.
#[derive(Clone)]
pub struct WriteQueue {
    inner: Arc<WriteQueueInner>,
}

impl WriteQueue {
    /// Empty queue.
    pub fn new() -> Self {
        WriteQueue {
            inner: Arc::new(WriteQueueInner {
                pending: DashMap::new(),
                counter: AtomicU64::new(0),
            }),
        }
    }

    /// Registers `write` and runs it in the background.
    ///
    /// Failures are logged and otherwise swallowed. Must be called from
    /// within a Tokio runtime.
    pub fn enqueue<F>(&self, kind: WriteKind, key: &CacheKey, write: F)
    where
        F: Future<Output = BackendResult<()>> + Send + 'static,
    {
        let id = self.inner.counter.fetch_add(1, Ordering::Relaxed);
        let (done, settled) = oneshot::channel::<()>();
        // A dropped sender also settles the entry.
        let settled = settled.map(|_| ()).boxed().shared();
        self.inner.pending.insert(id, settled);
        metrics::record_pending_writes(self.inner.pending.len());

        let inner = Arc::clone(&self.inner);
        let span = info_span!("cache_write", kind = kind.as_str(), key = %key);
        tokio::spawn(
            async move {
                match write.await {
                    Ok(()) => debug!("cache write stored"),
                    Err(error) => {
                        warn!(%error, "cache write failed");
                        metrics::record_backend_error("set");
                    }
                }
                inner.pending.remove(&id);
                metrics::record_pending_writes(inner.pending.len());
                let _ = done.send(());
            }
            .instrument(span),
        );
    }

    /// Waits until every write registered before this call has settled.
    ///
    /// The set of writes is captured when `drain` is called, not when the
    /// returned future is first polled. Writes enqueued afterwards are not
    /// waited for. Concurrent drains are safe; each one waits on its own
    /// snapshot.
    pub fn drain(&self) -> impl Future<Output = ()> + Send + 'static {
        let (ids, settled): (Vec<u64>, Vec<Settled>) = self
            .inner
            .pending
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .unzip();
        let inner = Arc::clone(&self.inner);

        async move {
            if settled.is_empty() {
                return;
            }
            debug!(writes = settled.len(), "waiting for pending cache writes");
            join_all(settled).await;

            // Normally the tasks already removed themselves. This clears
            // entries whose task panicked.
            for id in ids {
                inner.pending.remove(&id);
            }
        }
    }

    /// Number of writes that have not settled yet.
    pub fn pending(&self) -> usize {
        self.inner.pending.len()
    }
}

impl Default for WriteQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WriteQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteQueue")
            .field("pending", &self.pending())
            .finish()
    }
}
