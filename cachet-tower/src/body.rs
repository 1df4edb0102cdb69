use bytes::{Buf, Bytes};
use http::HeaderMap;
use http_body::{Body as HttpBody, Frame, SizeHint};
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Response body produced by [`CacheService`](crate::service::CacheService).
///
/// - [`Complete`](CacheBody::Complete): body buffered in memory, either read
///   from the cache or collected from upstream for storage.
/// - [`Trailed`](CacheBody::Trailed): upstream body collected together with
///   its trailers. Such responses are never stored.
/// - [`Passthrough`](CacheBody::Passthrough): upstream body streamed as is
///   (bypassed requests and error responses).
#[pin_project(project = CacheBodyProj)]
#[derive(Debug)]
pub enum CacheBody<B> {
    /// Buffered body. `None` once it has been yielded.
    Complete(Option<Bytes>),
    /// Buffered body followed by trailers.
    Trailed {
        /// Data frame, `None` once yielded.
        data: Option<Bytes>,
        /// Trailers frame, `None` once yielded.
        trailers: Option<HeaderMap>,
    },
    /// Untouched upstream body.
    Passthrough(#[pin] B),
}

impl<B> CacheBody<B> {
    /// Buffered body from bytes.
    pub fn complete(bytes: Bytes) -> Self {
        CacheBody::Complete(Some(bytes))
    }

    /// Buffered body from bytes and trailers.
    pub fn trailed(bytes: Bytes, trailers: HeaderMap) -> Self {
        CacheBody::Trailed {
            data: Some(bytes).filter(|bytes| !bytes.is_empty()),
            trailers: Some(trailers),
        }
    }
}

impl<B> HttpBody for CacheBody<B>
where
    B: HttpBody,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.project() {
            CacheBodyProj::Complete(data) => Poll::Ready(
                data.take()
                    .filter(|bytes| !bytes.is_empty())
                    .map(|bytes| Ok(Frame::data(bytes))),
            ),
            CacheBodyProj::Trailed { data, trailers } => Poll::Ready(
                data.take()
                    .map(Frame::data)
                    .or_else(|| trailers.take().map(Frame::trailers))
                    .map(Ok),
            ),
            CacheBodyProj::Passthrough(body) => body.poll_frame(cx).map(|next| {
                next.map(|result| {
                    result.map(|frame| {
                        frame.map_data(|mut data| data.copy_to_bytes(data.remaining()))
                    })
                })
            }),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            CacheBody::Complete(data) => data.as_ref().is_none_or(Bytes::is_empty),
            CacheBody::Trailed { data, trailers } => data.is_none() && trailers.is_none(),
            CacheBody::Passthrough(body) => body.is_end_stream(),
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            CacheBody::Complete(Some(bytes)) => SizeHint::with_exact(bytes.len() as u64),
            CacheBody::Complete(None) => SizeHint::with_exact(0),
            CacheBody::Trailed { data, .. } => {
                SizeHint::with_exact(data.as_ref().map_or(0, |bytes| bytes.len() as u64))
            }
            CacheBody::Passthrough(body) => body.size_hint(),
        }
    }
}
