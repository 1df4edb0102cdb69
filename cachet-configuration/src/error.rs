use thiserror::Error;

/// Errors raised while loading configuration or constructing a backend.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid YAML for [`CacheConfig`](crate::CacheConfig).
    #[error("invalid cache configuration: {0}")]
    Parse(String),

    /// The backend is not compiled in or could not be constructed.
    #[error("backend not available: {0}")]
    BackendNotAvailable(String),
}
