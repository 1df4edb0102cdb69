//! Serialized form of a cached response's metadata.
//!
//! A cached response is stored as two backend entries: the raw body under the
//! cache key and a JSON document of [`StoredHeaders`] under the key with the
//! configured suffix appended.

use bytes::Bytes;
use cachet_backend::FormatError;
use http::{HeaderMap, StatusCode, header::HeaderName};
use serde::{Deserialize, Serialize};

/// Status and headers of a captured response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredHeaders {
    /// Response status. Entries written without one replay as `200 OK`.
    #[serde(default, with = "http_serde::status_code")]
    pub status: StatusCode,
    /// Response headers as they were sent to the first client.
    #[serde(with = "http_serde::header_map")]
    pub headers: HeaderMap,
}

impl StoredHeaders {
    /// Snapshot of `status` and `headers`.
    pub fn new(status: StatusCode, headers: HeaderMap) -> Self {
        StoredHeaders { status, headers }
    }

    /// JSON encoding.
    pub fn encode(&self) -> Result<Bytes, FormatError> {
        serde_json::to_vec(self)
            .map(Bytes::from)
            .map_err(|err| FormatError::Serialize(Box::new(err)))
    }

    /// Parses a JSON encoded entry.
    pub fn decode(data: &[u8]) -> Result<Self, FormatError> {
        serde_json::from_slice(data).map_err(|err| FormatError::Deserialize(Box::new(err)))
    }

    /// Appends the stored headers to `target`, skipping `excluded` names.
    pub fn replay_into(self, target: &mut HeaderMap, excluded: &[&HeaderName]) {
        let mut current = None;
        for (name, value) in self.headers {
            if let Some(name) = name {
                current = Some(name);
            }
            let Some(name) = current.as_ref() else {
                continue;
            };
            if excluded.contains(&name) {
                continue;
            }
            target.append(name.clone(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{
        HeaderValue,
        header::{CACHE_CONTROL, CONTENT_TYPE, SET_COOKIE},
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_status_defaults_to_ok() {
        let stored = StoredHeaders::decode(br#"{"headers":{"content-type":"text/plain"}}"#).unwrap();
        assert_eq!(stored.status, StatusCode::OK);
        assert_eq!(stored.headers[CONTENT_TYPE], "text/plain");
    }

    #[test]
    fn malformed_entry_is_a_format_error() {
        let error = StoredHeaders::decode(b"not json").unwrap_err();
        assert!(matches!(error, FormatError::Deserialize(_)));
    }

    #[test]
    fn multi_valued_headers_survive_encoding() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(SET_COOKIE, HeaderValue::from_static("b=2"));
        let stored = StoredHeaders::new(StatusCode::CREATED, headers);

        let decoded = StoredHeaders::decode(&stored.encode().unwrap()).unwrap();
        assert_eq!(decoded, stored);
    }

    #[test]
    fn replay_skips_excluded_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        headers.append(SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(SET_COOKIE, HeaderValue::from_static("b=2"));

        let mut target = HeaderMap::new();
        StoredHeaders::new(StatusCode::OK, headers).replay_into(&mut target, &[&CACHE_CONTROL]);

        assert_eq!(target[CONTENT_TYPE], "text/plain");
        assert!(!target.contains_key(CACHE_CONTROL));
        assert_eq!(target.get_all(SET_COOKIE).iter().count(), 2);
    }
}
