#![allow(dead_code)]

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use bytes::Bytes;
use cachet_tower::CacheBody;
use http::{HeaderMap, Request, Response, StatusCode};
use http_body::{Body, Frame};
use http_body_util::{BodyExt, Full};
use tower::{BoxError, Service, ServiceExt};

pub type UpstreamFuture =
    Pin<Box<dyn std::future::Future<Output = Result<Response<Full<Bytes>>, Infallible>> + Send>>;

/// Upstream answering with a fixed response and counting its calls.
#[derive(Clone)]
pub struct Upstream {
    pub calls: Arc<AtomicUsize>,
    status: StatusCode,
    headers: Vec<(&'static str, &'static str)>,
    body: &'static str,
}

impl Upstream {
    pub fn new(body: &'static str) -> Self {
        Upstream {
            calls: Arc::new(AtomicUsize::new(0)),
            status: StatusCode::OK,
            headers: Vec::new(),
            body,
        }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<ReqBody> Service<Request<ReqBody>> for Upstream {
    type Response = Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = UpstreamFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _request: Request<ReqBody>) -> Self::Future {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut response = Response::builder().status(self.status);
        for (name, value) in &self.headers {
            response = response.header(*name, *value);
        }
        let response = response
            .body(Full::new(Bytes::from_static(self.body.as_bytes())))
            .expect("valid test response");
        Box::pin(async move { Ok(response) })
    }
}

/// Body that fails on the first poll.
#[derive(Debug)]
pub struct FailingBody;

impl Body for FailingBody {
    type Data = Bytes;
    type Error = std::io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Poll::Ready(Some(Err(std::io::Error::other("connection reset"))))
    }
}

/// Body yielding one data frame followed by trailers.
#[derive(Debug)]
pub struct TrailersBody {
    data: Option<Bytes>,
    trailers: Option<HeaderMap>,
}

impl TrailersBody {
    pub fn new(data: &'static str, trailers: HeaderMap) -> Self {
        TrailersBody {
            data: Some(Bytes::from_static(data.as_bytes())),
            trailers: Some(trailers),
        }
    }
}

impl Body for TrailersBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        let frame = match this.data.take() {
            Some(data) => Some(Frame::data(data)),
            None => this.trailers.take().map(Frame::trailers),
        };
        Poll::Ready(frame.map(Ok))
    }
}

pub fn get(uri: &str) -> Request<()> {
    Request::get(uri).body(()).expect("valid test request")
}

pub async fn send<S>(service: &S, request: Request<()>) -> Result<Response<Bytes>, BoxError>
where
    S: Service<Request<()>, Response = Response<CacheBody<Full<Bytes>>>, Error = BoxError>
        + Clone,
{
    let response = service.clone().oneshot(request).await?;
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await?.to_bytes();
    Ok(Response::from_parts(parts, bytes))
}
