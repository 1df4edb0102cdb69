use cachet_backend::Backend as BackendTrait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ConfigError;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Redis {
    /// Connection URL, e.g. `redis://127.0.0.1:6379/`.
    pub server: String,
    /// Prepended to every cache key.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Optional label for this backend (used in tracing).
    #[serde(default)]
    pub label: Option<String>,
}

impl Redis {
    #[cfg(feature = "redis")]
    pub fn into_backend(self) -> Result<Arc<dyn BackendTrait + Send + 'static>, ConfigError> {
        use cachet_redis::RedisBackend;

        let mut builder = RedisBackend::builder().server(self.server);
        if let Some(prefix) = self.prefix {
            builder = builder.prefix(prefix);
        }
        if let Some(label) = self.label {
            builder = builder.name(label);
        }

        let backend = builder
            .build()
            .map_err(|e| ConfigError::BackendNotAvailable(format!("Redis: {}", e)))?;

        Ok(Arc::new(backend))
    }

    #[cfg(not(feature = "redis"))]
    pub fn into_backend(self) -> Result<Arc<dyn BackendTrait + Send + 'static>, ConfigError> {
        Err(ConfigError::BackendNotAvailable("Redis".to_string()))
    }
}
