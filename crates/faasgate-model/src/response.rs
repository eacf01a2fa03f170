//! Canonical outbound response.

use std::str::FromStr;

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

use crate::error::{GateError, GateResult};

/// Response payload, carried either as text or as raw bytes.
///
/// The variant records how the handler produced the payload; each provider
/// adapter decides how that maps onto the provider's wire format (plain text
/// versus base64-flagged binary).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// UTF-8 text payload.
    Text(String),
    /// Raw byte payload.
    Binary(Bytes),
}

impl ResponseBody {
    /// Payload as raw bytes, regardless of variant.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(s) => s.as_bytes(),
            Self::Binary(b) => b,
        }
    }

    /// Payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the payload is zero bytes long.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// Provider-independent representation of an outbound HTTP response.
///
/// Built incrementally through [`ResponseBuilder`], then frozen: once a
/// response has been handed to an adapter for encoding there is no mutable
/// API left to touch it with.
#[derive(Debug, Clone)]
pub struct CanonicalResponse {
    status: StatusCode,
    headers: HeaderMap,
    content_type: Option<String>,
    body: Option<ResponseBody>,
}

impl CanonicalResponse {
    /// Start building a response. Status defaults to 200.
    #[must_use]
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::default()
    }

    /// Finalized status code, always within 100..=599.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers, not including the implicit `Content-Type`
    /// contributed by [`content_type`](Self::content_type) on encode.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Declared content type, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Response body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&ResponseBody> {
        self.body.as_ref()
    }
}

/// Builder for [`CanonicalResponse`].
///
/// Setters never fail; all validation happens atomically in
/// [`build`](Self::build).
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    status: Option<u16>,
    pending_headers: Vec<(String, String)>,
    content_type: Option<String>,
    body: Option<ResponseBody>,
}

impl ResponseBuilder {
    /// Set the status code. Defaults to 200 when never called.
    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Append a header value. Validity is checked in [`build`](Self::build).
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.pending_headers.push((name.into(), value.into()));
        self
    }

    /// Set the content type. Encoders emit it as a `Content-Type` header.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set a UTF-8 text body.
    #[must_use]
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(ResponseBody::Text(body.into()));
        self
    }

    /// Set a raw binary body.
    #[must_use]
    pub fn binary(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(ResponseBody::Binary(body.into()));
        self
    }

    /// Finalize the response.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidResponse`] when the status code falls
    /// outside 100..=599 or an appended header cannot be represented.
    pub fn build(self) -> GateResult<CanonicalResponse> {
        let raw_status = self.status.unwrap_or(200);
        if !(100..=599).contains(&raw_status) {
            return Err(GateError::invalid_status(raw_status));
        }
        let status = StatusCode::from_u16(raw_status)
            .map_err(|_| GateError::invalid_status(raw_status))?;

        let mut headers = HeaderMap::new();
        for (name, value) in self.pending_headers {
            let name = HeaderName::from_str(&name).map_err(|_| {
                GateError::InvalidResponse(format!("invalid header name: {name}"))
            })?;
            let value = HeaderValue::from_str(&value).map_err(|_| {
                GateError::InvalidResponse(format!("invalid value for header {name}"))
            })?;
            headers.append(name, value);
        }

        Ok(CanonicalResponse {
            status,
            headers,
            content_type: self.content_type,
            body: self.body,
        })
    }
}

/// Canonical 400 produced when a native payload cannot be decoded.
///
/// Hosts call this when an adapter's decode fails, so the provider runtime
/// still receives a well-formed HTTP-shaped response instead of a raw fault.
#[must_use]
pub fn rejection(err: &GateError) -> CanonicalResponse {
    CanonicalResponse {
        status: StatusCode::BAD_REQUEST,
        headers: HeaderMap::new(),
        content_type: Some("text/plain".to_owned()),
        body: Some(ResponseBody::Text(err.to_string())),
    }
}

/// Whether a content type designates a textual payload.
///
/// Text types, JSON, XML, javascript, and form encodings count as textual;
/// everything else (and an unparsable type) is treated as binary. Adapters
/// use this to choose between plain-text and base64 wire encodings.
#[must_use]
pub fn is_textual_content_type(content_type: &str) -> bool {
    let Ok(mime) = content_type.parse::<mime::Mime>() else {
        return false;
    };
    if mime.type_() == mime::TEXT {
        return true;
    }
    matches!(
        (mime.type_(), mime.subtype()),
        (mime::APPLICATION, mime::JSON)
            | (mime::APPLICATION, mime::JAVASCRIPT)
            | (mime::APPLICATION, mime::XML)
            | (mime::APPLICATION, mime::WWW_FORM_URLENCODED)
    ) || mime.suffix() == Some(mime::JSON)
        || mime.suffix() == Some(mime::XML)
}
