//! Error types for cache operations.

use http::header::InvalidHeaderName;
use thiserror::Error;

/// Type-erased error used at the seams with user code and HTTP services.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that abort a single request.
///
/// Backend failures are deliberately absent: a failing store degrades the
/// request to a miss (on read) or is logged (on write), it never fails the
/// request.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The configured key resolver returned an error.
    ///
    /// This indicates a programming error in the resolver, so it is
    /// propagated to the caller instead of silently bypassing the cache.
    #[error("cache key resolution failed")]
    KeyResolver(#[source] BoxError),

    /// The upstream response body could not be read while capturing it.
    #[error("failed to read upstream response body")]
    Body(#[source] BoxError),
}

/// Errors raised while building a [`Config`](crate::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A header name given in settings is not a valid HTTP header name.
    #[error("invalid header name {name:?}")]
    InvalidHeaderName {
        /// The rejected value.
        name: String,
        /// Parser error.
        #[source]
        source: InvalidHeaderName,
    },
}
