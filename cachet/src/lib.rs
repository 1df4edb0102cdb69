//! Response caching for HTTP services.
//!
//! `cachet` stores successful `GET` responses in a [`Backend`] and replays
//! them to later requests with the same key. Every response is marked with a
//! cache status header (`HIT`, `MISS` or `BYPASS`).
//!
//! This crate holds the framework independent decision engine. Use
//! `cachet-tower` to plug it into a Tower/Axum/Hyper stack and `cachet-moka`
//! or `cachet-redis` for storage.
//!
//! # Storage layout
//!
//! A response is stored as two entries:
//!
//! | Key | Value |
//! |-----|-------|
//! | `<key>` | raw body bytes |
//! | `<key>:headers` | JSON `{"status": 200, "headers": {...}}` |
//!
//! Writes happen in the background. A lookup waits for writes queued before
//! it, so a client that repeats a request right after a miss gets a hit.
//!
//! # Hints from upstream layers
//!
//! Layers in front of the cache can attach [`ResponseLocals`] to the request
//! to stage response headers, override the cache key through the
//! `x-cache-key` hint header, or set a per-route [`MaxAge`].
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod capture;
pub mod config;
pub mod engine;
pub mod entry;
pub mod error;
pub mod expiry;
pub mod key;
pub mod locals;
pub mod metrics;
pub mod predicate;
pub mod queue;
pub mod status;

pub use cachet_backend::{Backend, BackendError, CacheKey, SetOptions};

pub use capture::{Captured, ResponseCapture};
pub use config::{Config, ConfigBuilder, DEFAULT_EXPIRY, DEFAULT_HEADERS_SUFFIX, Settings};
pub use engine::{CachedResponse, Classification, Engine, Lookup};
pub use entry::StoredHeaders;
pub use error::{BoxError, CacheError, ConfigError};
pub use expiry::{DefaultExpiryResolver, ExpiryResolver};
pub use key::{DefaultKeyResolver, KeyResolver};
pub use locals::{MaxAge, ResponseLocals};
pub use predicate::{ErrorPredicate, StatusThreshold};
pub use queue::{WriteKind, WriteQueue};
pub use status::{CacheStatus, DEFAULT_CACHE_KEY_HEADER, DEFAULT_CACHE_STATUS_HEADER};
