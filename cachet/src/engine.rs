//! Cache decision engine.
//!
//! The engine is framework agnostic. It works on `http` request and response
//! parts and leaves body handling to the integration (see `cachet-tower`).
//! A request goes through three steps:
//!
//! 1. [`Engine::classify`] decides between bypass and a cache key.
//! 2. [`Engine::lookup`] waits for pending writes and reads the backend.
//! 3. On a miss, [`Engine::capture`] hands out a [`ResponseCapture`] that
//!    stores the upstream response in the background.

use std::sync::Arc;

use bytes::Bytes;
use cachet_backend::{Backend, CacheKey};
use http::{HeaderMap, HeaderValue, Method, Response, header::CACHE_CONTROL, request};
use tracing::{debug, warn};

use crate::{
    capture::ResponseCapture,
    config::Config,
    entry::StoredHeaders,
    error::CacheError,
    locals::ResponseLocals,
    metrics,
    queue::WriteQueue,
    status::CacheStatus,
};

/// Outcome of [`Engine::classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Forward upstream without touching the backend.
    Bypass,
    /// Look the response up under this key.
    Cacheable(CacheKey),
}

/// Outcome of [`Engine::lookup`].
#[derive(Debug)]
pub enum Lookup {
    /// A stored response was found.
    Hit(CachedResponse),
    /// Nothing usable was found.
    Miss,
}

/// Stored response read back from the backend.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    /// Stored body.
    pub body: Bytes,
    /// Stored status and headers. `None` when the headers entry is missing
    /// or unreadable; the body is still served.
    pub headers: Option<StoredHeaders>,
}

/// Shared cache state: backend, configuration and write queue.
///
/// Cloning is cheap and clones share the write queue.
#[derive(Debug)]
pub struct Engine<B> {
    backend: Arc<B>,
    config: Arc<Config>,
    queue: WriteQueue,
}

impl<B> Clone for Engine<B> {
    fn clone(&self) -> Self {
        Engine {
            backend: Arc::clone(&self.backend),
            config: Arc::clone(&self.config),
            queue: self.queue.clone(),
        }
    }
}

impl<B> Engine<B>
where
    B: Backend + 'static,
{
    /// Engine over `backend` with its own write queue.
    pub fn new(backend: B, config: Config) -> Self {
        Engine {
            backend: Arc::new(backend),
            config: Arc::new(config),
            queue: WriteQueue::new(),
        }
    }

    /// Resolved configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Backend the engine reads and writes.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Queue of in-flight writes.
    pub fn queue(&self) -> &WriteQueue {
        &self.queue
    }

    /// Decides whether a request takes part in caching.
    ///
    /// Only `GET` is cacheable. For other methods the key resolver is not
    /// consulted. A resolver error aborts the request.
    pub fn classify(&self, request: &request::Parts) -> Result<Classification, CacheError> {
        if request.method != Method::GET {
            debug!(method = %request.method, "bypassing cache for non-GET request");
            metrics::record_status(CacheStatus::Bypass);
            return Ok(Classification::Bypass);
        }

        let fallback = ResponseLocals::default();
        let locals = ResponseLocals::of(request).unwrap_or(&fallback);
        let key = self
            .config
            .key_resolver
            .resolve(request, locals)
            .map_err(CacheError::KeyResolver)?;

        match key {
            Some(key) => Ok(Classification::Cacheable(key)),
            None => {
                debug!(uri = %request.uri, "no cache key resolved, bypassing cache");
                metrics::record_status(CacheStatus::Bypass);
                Ok(Classification::Bypass)
            }
        }
    }

    /// Reads the stored response for `key`.
    ///
    /// Waits for every write queued before the call so a store issued by an
    /// earlier request is visible. Backend read errors are logged and
    /// reported as a miss.
    pub async fn lookup(&self, key: &CacheKey) -> Lookup {
        self.queue.drain().await;

        let body = match self.backend.get(key).await {
            Ok(Some(body)) if !body.is_empty() => body,
            Ok(_) => {
                debug!(%key, "cache miss");
                metrics::record_status(CacheStatus::Miss);
                return Lookup::Miss;
            }
            Err(error) => {
                warn!(%key, %error, "cache read failed, treating as miss");
                metrics::record_backend_error("get");
                metrics::record_status(CacheStatus::Miss);
                return Lookup::Miss;
            }
        };

        let headers_key = key.with_suffix(&self.config.headers_suffix);
        let headers = match self.backend.get(&headers_key).await {
            Ok(Some(data)) => match StoredHeaders::decode(&data) {
                Ok(headers) => Some(headers),
                Err(error) => {
                    warn!(key = %headers_key, %error, "ignoring malformed stored headers");
                    None
                }
            },
            Ok(None) => {
                debug!(key = %headers_key, "stored headers missing");
                None
            }
            Err(error) => {
                debug!(key = %headers_key, %error, "failed to read stored headers");
                metrics::record_backend_error("get");
                None
            }
        };

        debug!(%key, "cache hit");
        metrics::record_status(CacheStatus::Hit);
        Lookup::Hit(CachedResponse { body, headers })
    }

    /// Starts capturing the upstream response for `key`.
    pub fn capture(&self, key: CacheKey) -> ResponseCapture<B> {
        ResponseCapture::new(
            key,
            Arc::clone(&self.backend),
            Arc::clone(&self.config),
            self.queue.clone(),
        )
    }

    /// Sets the status header and, when given, the key header.
    ///
    /// Call this before any other header manipulation on the response.
    pub fn stamp(&self, headers: &mut HeaderMap, status: CacheStatus, key: Option<&CacheKey>) {
        headers.insert(self.config.status_header.clone(), status.header_value());
        if let Some(value) = key.and_then(|key| HeaderValue::from_str(key.as_str()).ok()) {
            headers.insert(self.config.key_header.clone(), value);
        }
    }

    /// Builds the response served on a hit.
    ///
    /// Stored status and headers are replayed except the cache status header
    /// and `Cache-Control`, which is always `max-age=0`.
    pub fn hit_response(&self, key: &CacheKey, cached: CachedResponse) -> Response<Bytes> {
        let mut response = Response::new(cached.body);
        self.stamp(response.headers_mut(), CacheStatus::Hit, Some(key));

        if let Some(stored) = cached.headers {
            *response.status_mut() = stored.status;
            stored.replay_into(
                response.headers_mut(),
                &[
                    &self.config.status_header,
                    &self.config.key_header,
                    &CACHE_CONTROL,
                ],
            );
        }

        response
            .headers_mut()
            .insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        response
    }
}
