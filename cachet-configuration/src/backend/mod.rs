use cachet_backend::Backend as BackendTrait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ConfigError;

mod moka;
mod redis;

pub use moka::Moka;
pub use redis::Redis;

/// Backend section of the configuration, selected by `type`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Backend {
    Moka(Moka),
    Redis(Redis),
}

impl Backend {
    /// Constructs the configured backend.
    ///
    /// Fails with [`ConfigError::BackendNotAvailable`] when the matching
    /// crate feature is disabled.
    pub fn into_backend(self) -> Result<Arc<dyn BackendTrait + Send + 'static>, ConfigError> {
        match self {
            Backend::Moka(config) => config.into_backend(),
            Backend::Redis(config) => config.into_backend(),
        }
    }
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Moka(Moka {
            max_entries: DEFAULT_MAX_ENTRIES,
            label: None,
        })
    }
}

/// Capacity of the in-memory backend used when the section is omitted.
pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;
