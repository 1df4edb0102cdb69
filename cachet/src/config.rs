//! Engine configuration.
//!
//! [`Settings`] is the serializable part (durations and names) that can come
//! from a file. [`Config`] is the resolved form holding the pluggable
//! resolvers. Values given to [`ConfigBuilder`] directly take precedence over
//! [`Settings`], which take precedence over defaults.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::header::HeaderName;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::{
    error::ConfigError,
    expiry::{DefaultExpiryResolver, ExpiryResolver},
    key::{DefaultKeyResolver, KeyResolver},
    predicate::{ErrorPredicate, StatusThreshold},
    status::{DEFAULT_CACHE_KEY_HEADER, DEFAULT_CACHE_STATUS_HEADER},
};

/// Expiry used when a response carries none: 30 days.
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Suffix appended to the cache key for the headers entry.
pub const DEFAULT_HEADERS_SUFFIX: &str = ":headers";

/// File-friendly settings. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Expiry for responses without one, e.g. `"30days"` or `"1h 30m"`.
    #[serde(with = "humantime_serde")]
    pub default_expiry: Option<Duration>,
    /// Name of the cache status header.
    pub status_header: Option<String>,
    /// Name of the cache key header.
    pub key_header: Option<String>,
    /// Suffix of the headers entry key.
    pub headers_suffix: Option<String>,
}

/// Resolved engine configuration.
#[derive(Clone)]
pub struct Config {
    pub(crate) key_resolver: Arc<dyn KeyResolver>,
    pub(crate) expiry_resolver: Arc<dyn ExpiryResolver>,
    pub(crate) error_predicate: Arc<dyn ErrorPredicate>,
    pub(crate) default_expiry: Duration,
    pub(crate) status_header: HeaderName,
    pub(crate) key_header: HeaderName,
    pub(crate) headers_suffix: SmolStr,
}

impl Config {
    /// Builder with everything unset.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Expiry applied when a response resolves to none or zero.
    pub fn default_expiry(&self) -> Duration {
        self.default_expiry
    }

    /// Name of the cache status header.
    pub fn status_header(&self) -> &HeaderName {
        &self.status_header
    }

    /// Name of the cache key header.
    pub fn key_header(&self) -> &HeaderName {
        &self.key_header
    }

    /// Suffix of the headers entry key.
    pub fn headers_suffix(&self) -> &str {
        &self.headers_suffix
    }
}

impl Default for Config {
    fn default() -> Self {
        let key_header = DEFAULT_CACHE_KEY_HEADER;
        Config {
            key_resolver: Arc::new(DefaultKeyResolver::with_hint_header(key_header.clone())),
            expiry_resolver: Arc::new(DefaultExpiryResolver),
            error_predicate: Arc::new(StatusThreshold::default()),
            default_expiry: DEFAULT_EXPIRY,
            status_header: DEFAULT_CACHE_STATUS_HEADER,
            key_header,
            headers_suffix: SmolStr::new_static(DEFAULT_HEADERS_SUFFIX),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("default_expiry", &self.default_expiry)
            .field("status_header", &self.status_header)
            .field("key_header", &self.key_header)
            .field("headers_suffix", &self.headers_suffix)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Config`].
#[derive(Default)]
pub struct ConfigBuilder {
    key_resolver: Option<Arc<dyn KeyResolver>>,
    expiry_resolver: Option<Arc<dyn ExpiryResolver>>,
    error_predicate: Option<Arc<dyn ErrorPredicate>>,
    default_expiry: Option<Duration>,
    status_header: Option<HeaderName>,
    key_header: Option<HeaderName>,
    headers_suffix: Option<SmolStr>,
    settings: Settings,
}

impl ConfigBuilder {
    /// Custom key resolver.
    ///
    /// Replaces the default one, including its key hint handling.
    pub fn key_resolver<R>(mut self, resolver: R) -> Self
    where
        R: KeyResolver + 'static,
    {
        self.key_resolver = Some(Arc::new(resolver));
        self
    }

    /// Custom expiry resolver.
    pub fn expiry_resolver<R>(mut self, resolver: R) -> Self
    where
        R: ExpiryResolver + 'static,
    {
        self.expiry_resolver = Some(Arc::new(resolver));
        self
    }

    /// Custom error predicate.
    pub fn error_predicate<P>(mut self, predicate: P) -> Self
    where
        P: ErrorPredicate + 'static,
    {
        self.error_predicate = Some(Arc::new(predicate));
        self
    }

    /// Expiry for responses that resolve to none or zero.
    ///
    /// A zero duration stores such entries without expiry.
    pub fn default_expiry(mut self, expiry: Duration) -> Self {
        self.default_expiry = Some(expiry);
        self
    }

    /// Name of the cache status header.
    pub fn status_header(mut self, name: HeaderName) -> Self {
        self.status_header = Some(name);
        self
    }

    /// Name of the cache key header.
    ///
    /// The default key resolver reads its hint from the same header.
    pub fn key_header(mut self, name: HeaderName) -> Self {
        self.key_header = Some(name);
        self
    }

    /// Suffix of the headers entry key.
    pub fn headers_suffix(mut self, suffix: impl Into<SmolStr>) -> Self {
        self.headers_suffix = Some(suffix.into());
        self
    }

    /// Fallback values for anything not set explicitly.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Resolves the configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        let Settings {
            default_expiry,
            status_header,
            key_header,
            headers_suffix,
        } = self.settings;

        let status_header = match self.status_header {
            Some(name) => name,
            None => parse_header(status_header)?.unwrap_or(DEFAULT_CACHE_STATUS_HEADER),
        };
        let key_header = match self.key_header {
            Some(name) => name,
            None => parse_header(key_header)?.unwrap_or(DEFAULT_CACHE_KEY_HEADER),
        };
        let key_resolver = self.key_resolver.unwrap_or_else(|| {
            Arc::new(DefaultKeyResolver::with_hint_header(key_header.clone()))
        });

        Ok(Config {
            key_resolver,
            expiry_resolver: self
                .expiry_resolver
                .unwrap_or_else(|| Arc::new(DefaultExpiryResolver)),
            error_predicate: self
                .error_predicate
                .unwrap_or_else(|| Arc::new(StatusThreshold::default())),
            default_expiry: self
                .default_expiry
                .or(default_expiry)
                .unwrap_or(DEFAULT_EXPIRY),
            status_header,
            key_header,
            headers_suffix: self
                .headers_suffix
                .or_else(|| headers_suffix.map(SmolStr::from))
                .unwrap_or_else(|| SmolStr::new_static(DEFAULT_HEADERS_SUFFIX)),
        })
    }
}

fn parse_header(name: Option<String>) -> Result<Option<HeaderName>, ConfigError> {
    name.map(|name| {
        HeaderName::try_from(name.as_str())
            .map_err(|source| ConfigError::InvalidHeaderName { name, source })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = Config::builder().build().unwrap();
        assert_eq!(config.default_expiry(), DEFAULT_EXPIRY);
        assert_eq!(config.status_header(), "x-cache-status");
        assert_eq!(config.key_header(), "x-cache-key");
        assert_eq!(config.headers_suffix(), ":headers");
    }

    #[test]
    fn settings_fill_unset_values() {
        let settings = Settings {
            default_expiry: Some(Duration::from_secs(60)),
            status_header: Some("X-Cache".to_owned()),
            key_header: None,
            headers_suffix: Some("#h".to_owned()),
        };
        let config = Config::builder().settings(settings).build().unwrap();
        assert_eq!(config.default_expiry(), Duration::from_secs(60));
        assert_eq!(config.status_header(), "x-cache");
        assert_eq!(config.key_header(), "x-cache-key");
        assert_eq!(config.headers_suffix(), "#h");
    }

    #[test]
    fn explicit_values_beat_settings() {
        let settings = Settings {
            default_expiry: Some(Duration::from_secs(60)),
            headers_suffix: Some("#h".to_owned()),
            ..Settings::default()
        };
        let config = Config::builder()
            .settings(settings)
            .default_expiry(Duration::from_secs(5))
            .headers_suffix("!meta")
            .build()
            .unwrap();
        assert_eq!(config.default_expiry(), Duration::from_secs(5));
        assert_eq!(config.headers_suffix(), "!meta");
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let settings = Settings {
            status_header: Some("not a header".to_owned()),
            ..Settings::default()
        };
        let error = Config::builder().settings(settings).build().unwrap_err();
        assert!(matches!(
            error,
            ConfigError::InvalidHeaderName { ref name, .. } if name == "not a header"
        ));
    }

    #[test]
    fn settings_from_yaml() {
        let yaml = r#"
default_expiry: 1h 30m
status_header: x-cache
"#;
        let settings: Settings = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(settings.default_expiry, Some(Duration::from_secs(5400)));
        assert_eq!(settings.status_header.as_deref(), Some("x-cache"));
        assert_eq!(settings.headers_suffix, None);
    }
}
