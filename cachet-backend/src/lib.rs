//! Traits and types for cachet backend interaction.
//!
//! The cache engine treats its store as an opaque key-value service with two
//! asynchronous primitives: [`Backend::get`] and [`Backend::set`]. Anything that
//! can answer those two calls can hold cached responses.
//!
//! If you want to implement your own backend, you are in the right place.
//!
//! # Built-in backends
//!
//! | Backend | Crate | Use Case |
//! |---------|-------|----------|
//! | Moka | `cachet-moka` | In-memory, single instance |
//! | Redis | `cachet-redis` | Distributed, multi-instance |
#![warn(missing_docs)]

mod backend;
mod error;
mod key;

#[cfg(feature = "test-helpers")]
pub mod testing;

pub use backend::{Backend, BackendResult, SetOptions};
pub use error::{BackendError, FormatError};
pub use key::{CacheKey, EmptyKeyError};
