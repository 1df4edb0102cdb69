//! Error types for backend operations.

use thiserror::Error;

/// Error type for backend operations.
///
/// This enum categorizes errors that can occur during cache backend interactions
/// into distinct groups for appropriate handling. The cache engine never
/// surfaces these to the HTTP caller: reads degrade to a miss and writes are
/// logged.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Internal backend error, state or computation error.
    ///
    /// Any error not related to network interaction.
    #[error(transparent)]
    InternalError(Box<dyn std::error::Error + Send + Sync>),

    /// Network interaction error.
    ///
    /// Errors occurring during communication with remote backends (e.g., Redis).
    #[error(transparent)]
    ConnectionError(Box<dyn std::error::Error + Send + Sync>),

    /// Stored value could not be encoded or decoded.
    #[error(transparent)]
    FormatError(#[from] FormatError),
}

/// Serializing\Deserializing stored value error.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Value could not be serialized before writing.
    #[error("serialization failed: {0}")]
    Serialize(Box<dyn std::error::Error + Send + Sync>),

    /// Stored bytes could not be deserialized.
    #[error("deserialization failed: {0}")]
    Deserialize(Box<dyn std::error::Error + Send + Sync>),
}
