//! Expiry resolution.

use http::{HeaderMap, header::CACHE_CONTROL, request, response};

use crate::locals::{MaxAge, ResponseLocals};

/// Determines how long a captured response may live in the backend.
///
/// Implementations see the response after staged headers have been merged.
/// `None` and `Some(0)` both make the entry use the configured default
/// expiry.
pub trait ExpiryResolver: Send + Sync {
    /// Expiry in seconds for `response`.
    fn resolve(&self, request: &request::Parts, response: &response::Parts) -> Option<u64>;
}

impl<F> ExpiryResolver for F
where
    F: Fn(&request::Parts, &response::Parts) -> Option<u64> + Send + Sync,
{
    fn resolve(&self, request: &request::Parts, response: &response::Parts) -> Option<u64> {
        self(request, response)
    }
}

/// Explicit overrides first, then the response's own `Cache-Control`.
///
/// Precedence:
/// 1. [`MaxAge`] in the response extensions
/// 2. [`MaxAge`] staged on the request's [`ResponseLocals`]
/// 3. `max-age` directive of the response `Cache-Control` header
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExpiryResolver;

impl ExpiryResolver for DefaultExpiryResolver {
    fn resolve(&self, request: &request::Parts, response: &response::Parts) -> Option<u64> {
        response
            .extensions
            .get::<MaxAge>()
            .copied()
            .or_else(|| ResponseLocals::of(request).and_then(ResponseLocals::max_age))
            .map(|max_age| max_age.as_secs())
            .or_else(|| max_age(&response.headers))
    }
}

/// Extracts the numeric `max-age` directive from `Cache-Control`.
///
/// Non-numeric values are ignored.
pub fn max_age(headers: &HeaderMap) -> Option<u64> {
    headers
        .get_all(CACHE_CONTROL)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .find_map(|directive| {
            let (name, value) = directive.trim().split_once('=')?;
            if !name.trim().eq_ignore_ascii_case("max-age") {
                return None;
            }
            value.trim().trim_matches('"').parse::<u64>().ok()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderValue, Request, Response};

    fn request_parts(locals: Option<ResponseLocals>) -> request::Parts {
        let mut request = Request::get("/").body(()).unwrap();
        if let Some(locals) = locals {
            request.extensions_mut().insert(locals);
        }
        request.into_parts().0
    }

    fn response_parts(cache_control: Option<&'static str>) -> response::Parts {
        let mut response = Response::new(());
        if let Some(value) = cache_control {
            response
                .headers_mut()
                .insert(CACHE_CONTROL, HeaderValue::from_static(value));
        }
        response.into_parts().0
    }

    #[test]
    fn cache_control_max_age() {
        let response = response_parts(Some("public, max-age=120"));
        assert_eq!(
            DefaultExpiryResolver.resolve(&request_parts(None), &response),
            Some(120)
        );
    }

    #[test]
    fn non_numeric_max_age_is_ignored() {
        let response = response_parts(Some("max-age=soon"));
        assert_eq!(
            DefaultExpiryResolver.resolve(&request_parts(None), &response),
            None
        );
    }

    #[test]
    fn no_directive_resolves_to_none() {
        let response = response_parts(Some("no-store"));
        assert_eq!(
            DefaultExpiryResolver.resolve(&request_parts(None), &response),
            None
        );
    }

    #[test]
    fn staged_override_beats_header() {
        let request = request_parts(Some(ResponseLocals::new().with_max_age(MaxAge(60))));
        let response = response_parts(Some("max-age=120"));
        assert_eq!(DefaultExpiryResolver.resolve(&request, &response), Some(60));
    }

    #[test]
    fn zero_override_is_honored() {
        let request = request_parts(Some(ResponseLocals::new().with_max_age(MaxAge(0))));
        let response = response_parts(Some("max-age=120"));
        assert_eq!(DefaultExpiryResolver.resolve(&request, &response), Some(0));
    }

    #[test]
    fn response_extension_beats_staged_override() {
        let request = request_parts(Some(ResponseLocals::new().with_max_age(MaxAge(60))));
        let mut response = response_parts(None);
        response.extensions.insert(MaxAge(5));
        assert_eq!(DefaultExpiryResolver.resolve(&request, &response), Some(5));
    }

    #[test]
    fn directive_name_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.append(CACHE_CONTROL, HeaderValue::from_static("private"));
        headers.append(CACHE_CONTROL, HeaderValue::from_static("Max-Age=7"));
        assert_eq!(max_age(&headers), Some(7));
    }
}
