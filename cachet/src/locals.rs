//! Response-local state staged by upstream layers.
//!
//! Middleware running in front of the cache can prepare parts of the eventual
//! response before the handler runs: headers (including the cache key hint)
//! and a per-route expiry override. They travel as a [`ResponseLocals`] value
//! in the request extensions.
//!
//! ```
//! use cachet::{MaxAge, ResponseLocals};
//! use http::Request;
//!
//! let mut request = Request::get("/anything").body(()).unwrap();
//! request.extensions_mut().insert(
//!     ResponseLocals::new()
//!         .with_header("x-cache-key", "pub1")
//!         .with_max_age(MaxAge::from_secs(60)),
//! );
//! ```
//!
//! Handlers can also attach a [`MaxAge`] to the response extensions; it takes
//! precedence over the one staged on the request.

use http::{HeaderMap, HeaderValue, header::HeaderName, request};

/// Expiry override in seconds.
///
/// Zero is a valid value: it is honored as an override and makes the entry
/// fall back to the default expiry when stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaxAge(pub u64);

impl MaxAge {
    /// Override of `secs` seconds.
    pub const fn from_secs(secs: u64) -> Self {
        MaxAge(secs)
    }

    /// Number of seconds.
    pub const fn as_secs(&self) -> u64 {
        self.0
    }
}

/// Response state staged before the cache layer runs.
#[derive(Debug, Clone, Default)]
pub struct ResponseLocals {
    headers: HeaderMap,
    max_age: Option<MaxAge>,
}

impl ResponseLocals {
    /// Empty locals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the locals attached to a request, if any.
    pub fn of(request: &request::Parts) -> Option<&ResponseLocals> {
        request.extensions.get::<ResponseLocals>()
    }

    /// Staged response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable access to staged response headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Stages a response header.
    ///
    /// Invalid names or values are ignored.
    pub fn with_header<K, V>(mut self, name: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        HeaderValue: TryFrom<V>,
    {
        if let (Ok(name), Ok(value)) = (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Per-route expiry override.
    pub fn max_age(&self) -> Option<MaxAge> {
        self.max_age
    }

    /// Sets the per-route expiry override.
    pub fn set_max_age(&mut self, max_age: MaxAge) {
        self.max_age = Some(max_age);
    }

    /// Builder-style [`set_max_age`](Self::set_max_age).
    pub fn with_max_age(mut self, max_age: MaxAge) -> Self {
        self.set_max_age(max_age);
        self
    }

    /// Copies staged headers into `headers`.
    ///
    /// Headers the handler already set win over staged ones.
    pub fn apply_to(&self, headers: &mut HeaderMap) {
        self.apply_except(headers, &[]);
    }

    /// [`apply_to`](Self::apply_to) leaving out the `excluded` names.
    pub fn apply_except(&self, headers: &mut HeaderMap, excluded: &[&HeaderName]) {
        for name in self.headers.keys() {
            if headers.contains_key(name) || excluded.contains(&name) {
                continue;
            }
            for value in self.headers.get_all(name) {
                headers.append(name.clone(), value.clone());
            }
        }
    }
}
