//! Buffered response type.

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, StatusCode};

/// Body of the synthetic offline response.
pub const OFFLINE_BODY: &str = "Offline";

/// A fully buffered HTTP response.
///
/// Unlike `http::Response`, this type is `Clone`: the same payload is handed
/// to the caller and to a background cache write, and the body is a
/// reference-counted [`Bytes`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl FetchResponse {
    /// Creates a response with no headers.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Creates a `200 OK` response.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// The synthetic response returned when neither network nor cache can
    /// satisfy a request: `503` with body `"Offline"`.
    pub fn offline() -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, OFFLINE_BODY).with_header(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )
    }

    /// Adds a header.
    pub fn with_header(mut self, name: http::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Response status.
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable response headers.
    #[inline]
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Response body.
    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// `true` for 2xx statuses.
    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }

    /// `true` when this is the synthetic offline response.
    pub fn is_offline(&self) -> bool {
        self.status == StatusCode::SERVICE_UNAVAILABLE
            && self.body.as_ref() == OFFLINE_BODY.as_bytes()
    }

    /// Value of the `content-length` header, `0` when absent or malformed.
    pub fn content_length(&self) -> u64 {
        self.headers
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Approximate heap footprint of this response.
    pub fn memory_size(&self) -> usize {
        let headers: usize = self
            .headers
            .iter()
            .map(|(name, value)| name.as_str().len() + value.len())
            .sum();
        std::mem::size_of::<Self>() + headers + self.body.len()
    }

    /// Converts into an `http::Response`.
    pub fn into_http(self) -> http::Response<Bytes> {
        let mut response = http::Response::new(self.body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl From<http::Response<Bytes>> for FetchResponse {
    fn from(response: http::Response<Bytes>) -> Self {
        let (parts, body) = response.into_parts();
        Self {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_response_shape() {
        let response = FetchResponse::offline();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.body().as_ref(), b"Offline");
        assert!(response.is_offline());
        assert!(!response.is_ok());
    }

    #[test]
    fn content_length_defaults_to_zero() {
        let response = FetchResponse::ok("abc");
        assert_eq!(response.content_length(), 0);

        let response = response.with_header(CONTENT_LENGTH, HeaderValue::from_static("3"));
        assert_eq!(response.content_length(), 3);

        let response = FetchResponse::ok("x")
            .with_header(CONTENT_LENGTH, HeaderValue::from_static("nope"));
        assert_eq!(response.content_length(), 0);
    }

    #[test]
    fn offline_response_as_http() {
        let response = FetchResponse::offline().into_http();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(response.body().as_ref(), b"Offline");
    }
}
