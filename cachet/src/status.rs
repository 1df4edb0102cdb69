//! Cache status indicator.

use std::fmt;

use http::{HeaderValue, header::HeaderName};

/// Default header name for the cache status (`HIT`/`MISS`/`BYPASS`).
pub const DEFAULT_CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-cache-status");

/// Default header name exposing the resolved cache key.
///
/// The same header doubles as the key hint upstream logic may stage on
/// [`ResponseLocals`](crate::ResponseLocals) to override the derived key.
pub const DEFAULT_CACHE_KEY_HEADER: HeaderName = HeaderName::from_static("x-cache-key");

/// Which path a request took through the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheStatus {
    /// Request was not eligible for caching and went straight upstream.
    Bypass,
    /// Response was served from the backend.
    Hit,
    /// Response came from upstream and may have been stored.
    Miss,
}

impl CacheStatus {
    /// Wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Bypass => "BYPASS",
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }

    /// Status as a header value.
    pub fn header_value(&self) -> HeaderValue {
        HeaderValue::from_static(self.as_str())
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
