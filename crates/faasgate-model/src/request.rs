//! Canonical inbound request.

use std::str::FromStr;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use percent_encoding::percent_decode_str;

use crate::error::{GateError, GateResult};
use crate::query::QueryMap;

/// Provider-independent representation of an inbound HTTP request.
///
/// Constructed once per invocation through [`CanonicalRequest::builder`],
/// immutable afterwards, and safe to share read-only across threads.
#[derive(Debug, Clone)]
pub struct CanonicalRequest {
    method: Method,
    path: String,
    query: QueryMap,
    headers: HeaderMap,
    content_type: Option<String>,
    body: Option<Bytes>,
}

impl CanonicalRequest {
    /// Start building a canonical request.
    #[must_use]
    pub fn builder() -> CanonicalRequestBuilder {
        CanonicalRequestBuilder::default()
    }

    /// HTTP method, normalized to uppercase at construction time.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Normalized request path. Always starts with `/`; never empty.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Multi-valued query parameters, insertion order preserved.
    #[must_use]
    pub fn query(&self) -> &QueryMap {
        &self.query
    }

    /// Request headers. Lookup is case-insensitive; names are folded to
    /// lowercase by the underlying [`HeaderMap`].
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of the given header, when it is valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Declared content type, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Request body. `None` means the invocation carried no body at all,
    /// which is distinct from `Some` of an empty byte sequence.
    #[must_use]
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }
}

/// Builder for [`CanonicalRequest`].
///
/// All required-field and format validation happens atomically in
/// [`build`](Self::build); a partially-constructed request never escapes.
#[derive(Debug, Default)]
pub struct CanonicalRequestBuilder {
    method: Option<String>,
    path: Option<String>,
    query: QueryMap,
    headers: HeaderMap,
    pending_headers: Vec<(String, String)>,
    content_type: Option<String>,
    body: Option<Bytes>,
}

impl CanonicalRequestBuilder {
    /// Set the HTTP method. Case-insensitive; normalized to uppercase.
    #[must_use]
    pub fn method(mut self, method: impl AsRef<str>) -> Self {
        self.method = Some(method.as_ref().to_owned());
        self
    }

    /// Set the request path. An empty string is normalized to `/`, and a
    /// missing leading slash is added.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the parsed query parameter map.
    #[must_use]
    pub fn query(mut self, query: QueryMap) -> Self {
        self.query = query;
        self
    }

    /// Replace the header map wholesale (used when the native shape already
    /// speaks `http::HeaderMap`).
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Append a single header value. Name/value validity is checked in
    /// [`build`](Self::build).
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.pending_headers.push((name.into(), value.into()));
        self
    }

    /// Set the declared content type explicitly. When absent, `build` falls
    /// back to the `Content-Type` header.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Attach a body. Not calling this (or passing `None`) leaves the
    /// request body-less.
    #[must_use]
    pub fn body(mut self, body: impl Into<Option<Bytes>>) -> Self {
        self.body = body.into();
        self
    }

    /// Validate all fields and produce the immutable request.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::MalformedInvocation`] when the method is missing,
    /// empty, or not a valid HTTP token, when the path was never supplied, or
    /// when an appended header has an invalid name or value.
    pub fn build(self) -> GateResult<CanonicalRequest> {
        let raw_method = self
            .method
            .ok_or_else(|| GateError::malformed("request method is required"))?;
        if raw_method.is_empty() {
            return Err(GateError::malformed("request method must not be empty"));
        }
        let method = Method::from_str(&raw_method.to_ascii_uppercase())
            .map_err(|_| GateError::malformed(format!("invalid request method: {raw_method}")))?;

        let raw_path = self
            .path
            .ok_or_else(|| GateError::malformed("request path is required"))?;
        let path = normalize_path(&raw_path);

        let mut headers = self.headers;
        for (name, value) in self.pending_headers {
            let name = HeaderName::from_str(&name)
                .map_err(|_| GateError::malformed(format!("invalid header name: {name}")))?;
            let value = HeaderValue::from_str(&value)
                .map_err(|_| GateError::malformed(format!("invalid value for header {name}")))?;
            headers.append(name, value);
        }

        let content_type = self.content_type.or_else(|| {
            headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned)
        });

        Ok(CanonicalRequest {
            method,
            path,
            query: self.query,
            headers,
            content_type,
            body: self.body,
        })
    }
}

/// Normalize a raw path: empty becomes `/`, a missing leading slash is added.
#[must_use]
pub fn normalize_path(raw: &str) -> String {
    if raw.is_empty() {
        return "/".to_owned();
    }
    if raw.starts_with('/') {
        raw.to_owned()
    } else {
        format!("/{raw}")
    }
}

/// Percent-decode a raw path as delivered by a provider.
///
/// Invalid UTF-8 sequences are replaced rather than rejected; routing
/// operates on the decoded form.
#[must_use]
pub fn decode_path(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}
