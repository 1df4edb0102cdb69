use cachet_backend::Backend as BackendTrait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ConfigError;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Moka {
    pub max_entries: u64,
    /// Optional label for this backend (used in tracing).
    #[serde(default)]
    pub label: Option<String>,
}

impl Moka {
    #[cfg(feature = "moka")]
    pub fn into_backend(self) -> Result<Arc<dyn BackendTrait + Send + 'static>, ConfigError> {
        use cachet_moka::MokaBackend;

        let mut builder = MokaBackend::builder().max_entries(self.max_entries);
        if let Some(label) = self.label {
            builder = builder.label(label);
        }

        Ok(Arc::new(builder.build()))
    }

    #[cfg(not(feature = "moka"))]
    pub fn into_backend(self) -> Result<Arc<dyn BackendTrait + Send + 'static>, ConfigError> {
        Err(ConfigError::BackendNotAvailable("Moka".to_string()))
    }
}
