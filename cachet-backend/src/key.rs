//! Cache key type.
//!
//! A [`CacheKey`] is a non-empty string naming an interchangeable class of
//! requests. Two requests resolving to the same key are served the same
//! cached response.
//!
//! ```
//! use cachet_backend::CacheKey;
//!
//! let key = CacheKey::new("/users?page=2").unwrap();
//! assert_eq!(key.as_str(), "/users?page=2");
//! assert_eq!(key.with_suffix(":headers").as_str(), "/users?page=2:headers");
//!
//! // Empty keys are rejected
//! assert!(CacheKey::new("").is_none());
//! ```
//!
//! [`CacheKey`] uses [`SmolStr`] internally, so short keys (≤23 bytes) are
//! stored inline and cloning is cheap.

use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, format_smolstr};
use thiserror::Error;

/// Error returned when constructing a [`CacheKey`] from an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cache key must not be empty")]
pub struct EmptyKeyError;

/// A non-empty string identifying a cached entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CacheKey(SmolStr);

impl CacheKey {
    /// Creates a key, returning `None` for an empty string.
    pub fn new(key: impl AsRef<str>) -> Option<Self> {
        let key = key.as_ref();
        (!key.is_empty()).then(|| CacheKey(SmolStr::new(key)))
    }

    /// Returns the key as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Derives a sibling key by appending `suffix`.
    ///
    /// Used to store secondary data (e.g. response headers) next to the
    /// primary entry.
    pub fn with_suffix(&self, suffix: &str) -> CacheKey {
        CacheKey(format_smolstr!("{}{}", self.0, suffix))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for CacheKey {
    type Error = EmptyKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CacheKey::new(value).ok_or(EmptyKeyError)
    }
}

impl TryFrom<&str> for CacheKey {
    type Error = EmptyKeyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        CacheKey::new(value).ok_or(EmptyKeyError)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_keeps_original_key() {
        let key = CacheKey::new("pub1").unwrap();
        let headers = key.with_suffix(":headers");
        assert_eq!(key.as_str(), "pub1");
        assert_eq!(headers.to_string(), "pub1:headers");
    }

    #[test]
    fn empty_string_is_rejected() {
        assert_eq!(CacheKey::try_from(String::new()), Err(EmptyKeyError));
        assert!(CacheKey::try_from("/").is_ok());
    }
}
