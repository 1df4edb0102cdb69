//! Error classification of upstream responses.

use http::{StatusCode, request, response};

/// Decides whether an upstream response is an error.
///
/// Error responses are passed through untouched and never stored.
pub trait ErrorPredicate: Send + Sync {
    /// Returns `true` when `response` must not be cached.
    fn is_error(&self, request: &request::Parts, response: &response::Parts) -> bool;
}

impl<F> ErrorPredicate for F
where
    F: Fn(&request::Parts, &response::Parts) -> bool + Send + Sync,
{
    fn is_error(&self, request: &request::Parts, response: &response::Parts) -> bool {
        self(request, response)
    }
}

/// Treats every status at or above a threshold as an error.
///
/// The default threshold is `400`.
#[derive(Debug, Clone, Copy)]
pub struct StatusThreshold {
    threshold: StatusCode,
}

impl StatusThreshold {
    /// Statuses `>= threshold` are errors.
    pub fn new(threshold: StatusCode) -> Self {
        StatusThreshold { threshold }
    }
}

impl Default for StatusThreshold {
    fn default() -> Self {
        Self::new(StatusCode::BAD_REQUEST)
    }
}

impl ErrorPredicate for StatusThreshold {
    fn is_error(&self, _request: &request::Parts, response: &response::Parts) -> bool {
        response.status >= self.threshold
    }
}
