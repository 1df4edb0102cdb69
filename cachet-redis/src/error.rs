//! Error types for Redis backend operations.
//!
//! All errors convert into [`BackendError`] for uniform handling by the cache
//! engine.
//!
//! [`BackendError`]: cachet_backend::BackendError

use cachet_backend::BackendError;
use redis::RedisError;

/// Error type for Redis backend operations.
///
/// You typically don't handle this error directly. It appears when:
///
/// - Using [`RedisBackendBuilder::build`] with an invalid connection URL
/// - Performing the first cache operation when Redis is unreachable
///   (connection is established lazily)
/// - Performing cache operations when the Redis server returns an error
///
/// [`RedisBackendBuilder::build`]: crate::RedisBackendBuilder::build
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error from the underlying Redis client.
    #[error("Redis backend error: {0}")]
    Redis(#[from] RedisError),
}

impl From<Error> for BackendError {
    fn from(error: Error) -> Self {
        match error {
            Error::Redis(err) if err.is_io_error() => {
                Self::ConnectionError(Box::new(err))
            }
            Error::Redis(err) => Self::InternalError(Box::new(err)),
        }
    }
}
