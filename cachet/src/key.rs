//! Cache key resolution.

use cachet_backend::CacheKey;
use http::{header::HeaderName, request};
use tracing::debug;

use crate::{error::BoxError, locals::ResponseLocals, status::DEFAULT_CACHE_KEY_HEADER};

/// Derives the cache key for a request.
///
/// Returning `Ok(None)` (or an empty key) means "do not cache this request";
/// the request bypasses the cache. Returning `Err` aborts the request.
///
/// Closures with the matching signature implement this trait:
///
/// ```
/// use cachet::{BoxError, KeyResolver, ResponseLocals};
///
/// fn by_path(
///     request: &http::request::Parts,
///     _: &ResponseLocals,
/// ) -> Result<Option<String>, BoxError> {
///     Ok(Some(request.uri.path().to_owned()))
/// }
///
/// fn assert_resolver<R: KeyResolver>(_: R) {}
/// assert_resolver(by_path);
/// ```
pub trait KeyResolver: Send + Sync {
    /// Resolves the key for `request`.
    fn resolve(
        &self,
        request: &request::Parts,
        locals: &ResponseLocals,
    ) -> Result<Option<CacheKey>, BoxError>;
}

impl<F> KeyResolver for F
where
    F: Fn(&request::Parts, &ResponseLocals) -> Result<Option<String>, BoxError> + Send + Sync,
{
    fn resolve(
        &self,
        request: &request::Parts,
        locals: &ResponseLocals,
    ) -> Result<Option<CacheKey>, BoxError> {
        Ok(self(request, locals)?.and_then(CacheKey::new))
    }
}

/// Key hint staged on [`ResponseLocals`], falling back to the request's
/// path and query.
#[derive(Debug, Clone)]
pub struct DefaultKeyResolver {
    hint_header: HeaderName,
}

impl DefaultKeyResolver {
    /// Resolver reading the hint from `x-cache-key`.
    pub fn new() -> Self {
        Self::with_hint_header(DEFAULT_CACHE_KEY_HEADER)
    }

    /// Resolver reading the hint from `hint_header`.
    pub fn with_hint_header(hint_header: HeaderName) -> Self {
        DefaultKeyResolver { hint_header }
    }
}

impl Default for DefaultKeyResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyResolver for DefaultKeyResolver {
    fn resolve(
        &self,
        request: &request::Parts,
        locals: &ResponseLocals,
    ) -> Result<Option<CacheKey>, BoxError> {
        if let Some(hint) = locals.headers().get(&self.hint_header) {
            match hint.to_str().ok().and_then(CacheKey::new) {
                Some(key) => return Ok(Some(key)),
                None => debug!(header = %self.hint_header, "ignoring unusable cache key hint"),
            }
        }
        Ok(request
            .uri
            .path_and_query()
            .and_then(|path| CacheKey::new(path.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Request;

    fn parts(uri: &str) -> request::Parts {
        Request::get(uri).body(()).unwrap().into_parts().0
    }

    #[test]
    fn path_and_query_is_the_default_key() {
        let key = DefaultKeyResolver::new()
            .resolve(&parts("/r?q=1"), &ResponseLocals::new())
            .unwrap();
        assert_eq!(key.unwrap().as_str(), "/r?q=1");
    }

    #[test]
    fn absolute_uri_keys_on_path_only() {
        let key = DefaultKeyResolver::new()
            .resolve(&parts("http://example.com/a/b?c"), &ResponseLocals::new())
            .unwrap();
        assert_eq!(key.unwrap().as_str(), "/a/b?c");
    }

    #[test]
    fn staged_hint_overrides_path() {
        let locals = ResponseLocals::new().with_header("x-cache-key", "pub1");
        let key = DefaultKeyResolver::new()
            .resolve(&parts("/anything"), &locals)
            .unwrap();
        assert_eq!(key.unwrap().as_str(), "pub1");
    }

    #[test]
    fn empty_hint_falls_back_to_path() {
        let locals = ResponseLocals::new().with_header("x-cache-key", "");
        let key = DefaultKeyResolver::new()
            .resolve(&parts("/fallback"), &locals)
            .unwrap();
        assert_eq!(key.unwrap().as_str(), "/fallback");
    }

    #[test]
    fn custom_hint_header() {
        let locals = ResponseLocals::new()
            .with_header("x-cache-key", "ignored")
            .with_header("x-route", "route-1");
        let key = DefaultKeyResolver::with_hint_header(HeaderName::from_static("x-route"))
            .resolve(&parts("/"), &locals)
            .unwrap();
        assert_eq!(key.unwrap().as_str(), "route-1");
    }

    #[test]
    fn closure_returning_empty_string_means_no_key() {
        let resolver =
            |_: &request::Parts, _: &ResponseLocals| -> Result<Option<String>, BoxError> {
                Ok(Some(String::new()))
            };
        let key = resolver.resolve(&parts("/"), &ResponseLocals::new()).unwrap();
        assert!(key.is_none());
    }

    #[test]
    fn closure_errors_are_returned() {
        let resolver =
            |_: &request::Parts, _: &ResponseLocals| -> Result<Option<String>, BoxError> {
                Err("boom".into())
            };
        let error = resolver
            .resolve(&parts("/"), &ResponseLocals::new())
            .unwrap_err();
        assert_eq!(error.to_string(), "boom");
    }
}
