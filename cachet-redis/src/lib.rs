//! Redis backend for cachet.
//!
//! Cached bodies and headers are stored as plain Redis strings. Expiry is
//! delegated to Redis with `SET key value EX seconds`.
//!
//! ```no_run
//! use cachet_redis::RedisBackend;
//!
//! let backend = RedisBackend::builder()
//!     .server("redis://127.0.0.1:6379/0")
//!     .build()
//!     .expect("valid redis url");
//! ```
#![warn(missing_docs)]

pub mod backend;
pub mod error;

#[doc(inline)]
pub use crate::backend::{RedisBackend, RedisBackendBuilder};
#[doc(inline)]
pub use crate::error::Error;
