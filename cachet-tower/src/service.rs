use std::task::{Context, Poll};

use cachet::{CacheError, CacheStatus, Classification, Engine, Lookup, ResponseLocals};
use cachet_backend::Backend;
use futures::future::BoxFuture;
use http::{Request, Response};
use http_body::Body as HttpBody;
use http_body_util::BodyExt;
use tower::{BoxError, Service};
use tracing::debug;

use crate::body::CacheBody;

/// Tower service that caches the responses of its upstream.
///
/// Created by the [`Cache`](crate::Cache) layer. All services created by one
/// layer share its backend and write queue.
pub struct CacheService<S, B> {
    upstream: S,
    engine: Engine<B>,
}

impl<S, B> CacheService<S, B> {
    /// Wraps `upstream`.
    pub fn new(upstream: S, engine: Engine<B>) -> Self {
        CacheService { upstream, engine }
    }
}

impl<S, B> Clone for CacheService<S, B>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            upstream: self.upstream.clone(),
            engine: self.engine.clone(),
        }
    }
}

impl<S, B, ReqBody, ResBody> Service<Request<ReqBody>> for CacheService<S, B>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    S::Error: Into<BoxError>,
    B: Backend + 'static,
    ReqBody: Send + 'static,
    ResBody: HttpBody + Send + 'static,
    ResBody::Data: Send,
    ResBody::Error: Into<BoxError>,
{
    type Response = Response<CacheBody<ResBody>>;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.upstream.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        // The readied instance serves this request, the clone stays behind.
        let clone = self.upstream.clone();
        let upstream = std::mem::replace(&mut self.upstream, clone);
        Box::pin(handle(self.engine.clone(), upstream, request))
    }
}

async fn handle<S, B, ReqBody, ResBody>(
    engine: Engine<B>,
    mut upstream: S,
    request: Request<ReqBody>,
) -> Result<Response<CacheBody<ResBody>>, BoxError>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Error: Into<BoxError>,
    B: Backend + 'static,
    ResBody: HttpBody,
    ResBody::Error: Into<BoxError>,
{
    let (parts, body) = request.into_parts();
    let locals = ResponseLocals::of(&parts).cloned().unwrap_or_default();

    let key = match engine.classify(&parts)? {
        Classification::Bypass => {
            let response = upstream
                .call(Request::from_parts(parts, body))
                .await
                .map_err(Into::into)?;
            let (mut head, body) = response.into_parts();
            engine.stamp(&mut head.headers, CacheStatus::Bypass, None);
            // No key was resolved, so a staged key hint is not echoed.
            locals.apply_except(&mut head.headers, &[engine.config().key_header()]);
            return Ok(Response::from_parts(head, CacheBody::Passthrough(body)));
        }
        Classification::Cacheable(key) => key,
    };

    if let Lookup::Hit(cached) = engine.lookup(&key).await {
        let (mut head, body) = engine.hit_response(&key, cached).into_parts();
        locals.apply_to(&mut head.headers);
        return Ok(Response::from_parts(head, CacheBody::complete(body)));
    }

    let capture = engine.capture(key);
    let request_parts = parts.clone();
    let response = upstream
        .call(Request::from_parts(parts, body))
        .await
        .map_err(Into::into)?;

    let (mut head, body) = response.into_parts();
    engine.stamp(&mut head.headers, CacheStatus::Miss, Some(capture.key()));
    locals.apply_to(&mut head.headers);

    if !capture.accepts(&request_parts, &head) {
        debug!(key = %capture.key(), status = %head.status, "passing error response through");
        return Ok(Response::from_parts(head, CacheBody::Passthrough(body)));
    }

    let collected = body
        .collect()
        .await
        .map_err(|error| CacheError::Body(error.into()))?;
    // Entries hold no trailers, so trailed responses are served but not stored.
    if let Some(trailers) = collected.trailers().cloned() {
        debug!(key = %capture.key(), "passing trailed response through");
        return Ok(Response::from_parts(
            head,
            CacheBody::trailed(collected.to_bytes(), trailers),
        ));
    }
    let bytes = collected.to_bytes();
    capture.store(&request_parts, &mut head, bytes.clone());

    Ok(Response::from_parts(head, CacheBody::complete(bytes)))
}
