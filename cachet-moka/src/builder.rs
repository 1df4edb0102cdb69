//! Builder for configuring [`MokaBackend`].

use std::time::{Duration, Instant};

use cachet_backend::CacheKey;
use moka::Expiry;
use moka::future::CacheBuilder;

use crate::backend::{Entry, MokaBackend};

/// Expiration policy reading the TTL each entry was written with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Expiration;

impl Expiry<CacheKey, Entry> for Expiration {
    fn expire_after_create(
        &self,
        _key: &CacheKey,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.options.expires
    }

    fn expire_after_update(
        &self,
        _key: &CacheKey,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        // Always use the NEW value's expiration time.
        //
        // Moka's default `expire_after_update` returns `duration_until_expiry`,
        // which preserves the OLD expiration time.
        value.options.expires
    }
}

/// Marker type: capacity has not been configured yet.
///
/// Call [`max_entries()`](MokaBackendBuilder::max_entries) before `build()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapacity;

/// Marker type: entry-count capacity has been configured.
///
/// The cache will hold at most `n` entries, evicting least recently used
/// entries when capacity is exceeded.
#[derive(Debug, Clone, Copy)]
pub struct EntryCapacity(pub(crate) u64);

/// Builder for creating and configuring a [`MokaBackend`].
///
/// ```
/// use cachet_moka::MokaBackend;
///
/// let backend = MokaBackend::builder()
///     .label("pages")
///     .max_entries(1_000)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct MokaBackendBuilder<Cap> {
    capacity: Cap,
    label: String,
}

impl MokaBackendBuilder<NoCapacity> {
    /// Creates a new builder with no capacity configured.
    pub fn new() -> Self {
        Self {
            capacity: NoCapacity,
            label: "moka".to_owned(),
        }
    }

    /// Sets the maximum number of entries the cache can hold.
    pub fn max_entries(self, capacity: u64) -> MokaBackendBuilder<EntryCapacity> {
        MokaBackendBuilder {
            capacity: EntryCapacity(capacity),
            label: self.label,
        }
    }
}

impl Default for MokaBackendBuilder<NoCapacity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Cap> MokaBackendBuilder<Cap> {
    /// Sets the label used in logs and metrics. Defaults to `"moka"`.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl MokaBackendBuilder<EntryCapacity> {
    /// Builds the backend.
    pub fn build(self) -> MokaBackend {
        let cache = CacheBuilder::new(self.capacity.0)
            .expire_after(Expiration)
            .build();
        MokaBackend {
            cache,
            label: self.label,
        }
    }
}
