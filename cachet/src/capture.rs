//! Capture of an upstream response for storage.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use cachet_backend::{Backend, CacheKey, SetOptions};
use http::{HeaderValue, header::CACHE_CONTROL, request, response};
use tracing::{debug, warn};

use crate::{
    config::Config,
    entry::StoredHeaders,
    queue::{WriteKind, WriteQueue},
};

/// Result of [`ResponseCapture::store`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Captured {
    /// Body and headers were queued for writing.
    Stored {
        /// Expiry the entries were written with, if any.
        expires: Option<Duration>,
    },
    /// The response was classified as an error.
    Error,
    /// The response had no body.
    Empty,
    /// The headers could not be serialized.
    Unencodable,
}

/// One-shot capture of the response to a missed request.
///
/// Created by [`Engine::capture`](crate::Engine::capture). The capture is
/// consumed by [`store`](Self::store), so a response can be stored at most
/// once. Dropping it without storing leaves the response untouched.
pub struct ResponseCapture<B> {
    key: CacheKey,
    backend: Arc<B>,
    config: Arc<Config>,
    queue: WriteQueue,
}

impl<B> ResponseCapture<B>
where
    B: Backend + 'static,
{
    pub(crate) fn new(
        key: CacheKey,
        backend: Arc<B>,
        config: Arc<Config>,
        queue: WriteQueue,
    ) -> Self {
        ResponseCapture {
            key,
            backend,
            config,
            queue,
        }
    }

    /// Key the response will be stored under.
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Whether the response is worth buffering.
    ///
    /// Error responses should be passed through as they are.
    pub fn accepts(&self, request: &request::Parts, response: &response::Parts) -> bool {
        !self.config.error_predicate.is_error(request, response)
    }

    /// Queues `body` and the response headers for storage.
    ///
    /// `response` must already carry every header that is sent to the
    /// client. When the resolved expiry is positive, `Cache-Control` is
    /// rewritten to `max-age=0` so downstream caches do not keep a copy.
    /// The stored headers keep the original value.
    pub fn store(
        self,
        request: &request::Parts,
        response: &mut response::Parts,
        body: Bytes,
    ) -> Captured {
        if !self.accepts(request, response) {
            debug!(key = %self.key, status = %response.status, "not storing error response");
            return Captured::Error;
        }
        if body.is_empty() {
            debug!(key = %self.key, "not storing empty response body");
            return Captured::Empty;
        }

        let resolved = self
            .config
            .expiry_resolver
            .resolve(request, response)
            .filter(|secs| *secs > 0);

        let headers =
            match StoredHeaders::new(response.status, response.headers.clone()).encode() {
                Ok(headers) => headers,
                Err(error) => {
                    warn!(key = %self.key, %error, "response headers are not storable");
                    return Captured::Unencodable;
                }
            };

        if resolved.is_some() {
            response
                .headers
                .insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        }

        let expires = resolved
            .map(Duration::from_secs)
            .or(Some(self.config.default_expiry))
            .filter(|ttl| !ttl.is_zero());
        let options = SetOptions { expires };

        let headers_key = self.key.with_suffix(&self.config.headers_suffix);
        debug!(key = %self.key, ?expires, "storing response");

        let backend = Arc::clone(&self.backend);
        let key = self.key.clone();
        self.queue.enqueue(WriteKind::Body, &self.key, async move {
            backend.set(&key, body, options).await
        });

        let backend = self.backend;
        let key = headers_key;
        self.queue.enqueue(WriteKind::Headers, &key.clone(), async move {
            backend.set(&key, headers, options).await
        });

        Captured::Stored { expires }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cachet_backend::testing::MockBackend;
    use http::{Request, Response, StatusCode, header::CONTENT_TYPE};
    use pretty_assertions::assert_eq;

    use crate::config::DEFAULT_EXPIRY;
    use crate::locals::MaxAge;

    fn capture(backend: &MockBackend, config: Config) -> (ResponseCapture<MockBackend>, WriteQueue) {
        let queue = WriteQueue::new();
        let capture = ResponseCapture::new(
            CacheKey::new("/r?q=1").unwrap(),
            Arc::new(backend.clone()),
            Arc::new(config),
            queue.clone(),
        );
        (capture, queue)
    }

    fn request() -> request::Parts {
        Request::get("/r?q=1").body(()).unwrap().into_parts().0
    }

    fn response(status: StatusCode, cache_control: Option<&'static str>) -> response::Parts {
        let mut response = Response::new(());
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain+x"));
        if let Some(value) = cache_control {
            response
                .headers_mut()
                .insert(CACHE_CONTROL, HeaderValue::from_static(value));
        }
        response.into_parts().0
    }

    #[tokio::test]
    async fn stores_body_and_headers() {
        let backend = MockBackend::new();
        let (capture, queue) = capture(&backend, Config::default());
        let mut response = response(StatusCode::OK, None);

        let captured = capture.store(&request(), &mut response, Bytes::from_static(b"hi"));
        queue.drain().await;

        assert_eq!(captured, Captured::Stored { expires: Some(DEFAULT_EXPIRY) });
        assert_eq!(backend.value("/r?q=1").unwrap(), Bytes::from_static(b"hi"));
        let stored = StoredHeaders::decode(&backend.value("/r?q=1:headers").unwrap()).unwrap();
        assert_eq!(stored.status, StatusCode::OK);
        assert_eq!(stored.headers[CONTENT_TYPE], "text/plain+x");
        // No positive expiry was resolved, so the client header is untouched.
        assert!(!response.headers.contains_key(CACHE_CONTROL));
    }

    #[tokio::test]
    async fn positive_expiry_rewrites_cache_control() {
        let backend = MockBackend::new();
        let (capture, queue) = capture(&backend, Config::default());
        let mut response = response(StatusCode::OK, Some("public, max-age=120"));

        let captured = capture.store(&request(), &mut response, Bytes::from_static(b"hi"));
        queue.drain().await;

        let ttl = Some(Duration::from_secs(120));
        assert_eq!(captured, Captured::Stored { expires: ttl });
        assert_eq!(response.headers[CACHE_CONTROL], "max-age=0");
        assert_eq!(backend.options("/r?q=1").unwrap().expires, ttl);
        assert_eq!(backend.options("/r?q=1:headers").unwrap().expires, ttl);
        let stored = StoredHeaders::decode(&backend.value("/r?q=1:headers").unwrap()).unwrap();
        assert_eq!(stored.headers[CACHE_CONTROL], "public, max-age=120");
    }

    #[tokio::test]
    async fn zero_override_uses_default_expiry() {
        let backend = MockBackend::new();
        let (capture, queue) = capture(&backend, Config::default());
        let mut response = response(StatusCode::OK, Some("max-age=120"));
        response.extensions.insert(MaxAge(0));

        capture.store(&request(), &mut response, Bytes::from_static(b"hi"));
        queue.drain().await;

        assert_eq!(
            backend.options("/r?q=1").unwrap().expires,
            Some(DEFAULT_EXPIRY)
        );
        assert_eq!(response.headers[CACHE_CONTROL], "max-age=120");
    }

    #[tokio::test]
    async fn error_responses_are_not_stored() {
        let backend = MockBackend::new();
        let (capture, queue) = capture(&backend, Config::default());
        let mut response = response(StatusCode::INTERNAL_SERVER_ERROR, None);

        let captured = capture.store(&request(), &mut response, Bytes::from_static(b"oops"));
        queue.drain().await;

        assert_eq!(captured, Captured::Error);
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn empty_bodies_are_not_stored() {
        let backend = MockBackend::new();
        let (capture, queue) = capture(&backend, Config::default());
        let mut response = response(StatusCode::OK, None);

        let captured = capture.store(&request(), &mut response, Bytes::new());
        queue.drain().await;

        assert_eq!(captured, Captured::Empty);
        assert_eq!(backend.set_count(), 0);
    }

    #[tokio::test]
    async fn zero_default_expiry_stores_without_ttl() {
        let backend = MockBackend::new();
        let config = Config::builder()
            .default_expiry(Duration::ZERO)
            .build()
            .unwrap();
        let (capture, queue) = capture(&backend, config);
        let mut response = response(StatusCode::OK, None);

        let captured = capture.store(&request(), &mut response, Bytes::from_static(b"hi"));
        queue.drain().await;

        assert_eq!(captured, Captured::Stored { expires: None });
        assert_eq!(backend.options("/r?q=1").unwrap().expires, None);
    }
}
