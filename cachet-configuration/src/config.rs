use std::sync::Arc;
use std::time::Duration;

use cachet::Settings;
use cachet_backend::Backend as BackendTrait;
use serde::{Deserialize, Serialize};

use crate::backend::Backend;
use crate::error::ConfigError;

/// Root of a cache configuration document.
///
/// ```yaml
/// default_expiry: 30days
/// status_header: x-cache-status
/// key_header: x-cache-key
/// headers_suffix: ":headers"
/// backend:
///   type: Redis
///   server: redis://127.0.0.1:6379/
/// ```
///
/// Every field is optional. Without a `backend` section an in-memory Moka
/// backend is used.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    /// Expiry for responses that carry none, in humantime format.
    #[serde(with = "humantime_serde")]
    pub default_expiry: Option<Duration>,
    /// Name of the cache status header.
    pub status_header: Option<String>,
    /// Name of the cache key header.
    pub key_header: Option<String>,
    /// Suffix of the headers entry key.
    pub headers_suffix: Option<String>,
    /// Storage backend.
    pub backend: Option<Backend>,
}

impl CacheConfig {
    /// Parses a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_saphyr::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Engine settings of this document.
    pub fn settings(&self) -> Settings {
        Settings {
            default_expiry: self.default_expiry,
            status_header: self.status_header.clone(),
            key_header: self.key_header.clone(),
            headers_suffix: self.headers_suffix.clone(),
        }
    }

    /// Builds the backend and returns it with the engine settings.
    pub fn into_parts(
        self,
    ) -> Result<(Arc<dyn BackendTrait + Send + 'static>, Settings), ConfigError> {
        let settings = self.settings();
        let backend = self.backend.unwrap_or_default().into_backend()?;
        Ok((backend, settings))
    }
}
