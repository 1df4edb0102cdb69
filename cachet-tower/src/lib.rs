//! Tower middleware for the cachet response cache.
//!
//! [`Cache`] is a Tower [`Layer`](tower::Layer) that stores successful `GET`
//! responses of the wrapped service and serves them to later requests with
//! the same key.
//!
//! ```no_run
//! use std::convert::Infallible;
//! use std::time::Duration;
//!
//! use bytes::Bytes;
//! use cachet_tower::Cache;
//! use http_body_util::Full;
//! use tower::{ServiceBuilder, service_fn};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = Cache::builder()
//!     .default_expiry(Duration::from_secs(3600))
//!     .build()?;
//!
//! let service = ServiceBuilder::new()
//!     .layer(cache)
//!     .service(service_fn(|_request: http::Request<()>| async {
//!         Ok::<_, Infallible>(http::Response::new(Full::new(Bytes::from("Hello"))))
//!     }));
//! # let _ = service;
//! # Ok(())
//! # }
//! ```
//!
//! # Response headers
//!
//! | Header | Value |
//! |--------|-------|
//! | `x-cache-status` | `HIT`, `MISS` or `BYPASS` |
//! | `x-cache-key` | resolved key (cacheable requests only) |
//! | `cache-control` | `max-age=0` on hits and on stored misses with an expiry |
//!
//! Both header names are configurable on [`CacheBuilder`].
//!
//! # Errors
//!
//! The service error is [`tower::BoxError`]. Upstream errors are passed
//! through unchanged. A failing key resolver or an unreadable upstream body
//! surfaces as [`cachet::CacheError`]. Backend failures never fail a
//! request.
#![warn(missing_docs)]

/// Response body type.
pub mod body;
/// Layer and builder.
pub mod layer;
/// The Tower service performing the caching.
pub mod service;

pub use body::CacheBody;
pub use cachet::{CacheError, CacheStatus, MaxAge, ResponseLocals, Settings};
pub use layer::{Cache, CacheBuilder, DEFAULT_CAPACITY, DefaultBackend};
pub use service::CacheService;
