//! Trigger object decode / response encode.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use faasgate_model::{
    CanonicalRequest, CanonicalResponse, GateError, GateResult, QueryMap, ResponseBody,
    decode_path, is_textual_content_type, normalize_path,
};

use crate::trigger::{TriggerBody, TriggerRequest, TriggerResponse};

/// Decode a typed trigger request into a canonical request.
///
/// The trigger's `url` may be a full URL or a bare path-and-query; either
/// way the path is percent-decoded and the query string parsed into the
/// multi-valued map.
///
/// # Errors
///
/// Returns [`GateError::MalformedInvocation`] for an empty method, an
/// undecodable base64 body, or unrepresentable headers.
pub fn decode(trigger: &TriggerRequest) -> GateResult<CanonicalRequest> {
    if trigger.method.is_empty() {
        return Err(GateError::malformed("trigger request carries no method"));
    }

    let (raw_path, raw_query) = split_url(&trigger.url);
    let mut builder = CanonicalRequest::builder()
        .method(&trigger.method)
        .path(normalize_path(&decode_path(raw_path)))
        .query(raw_query.map(QueryMap::parse).unwrap_or_default());

    for (name, values) in &trigger.headers {
        for value in values {
            builder = builder.header(name.clone(), value.clone());
        }
    }

    match &trigger.body {
        TriggerBody::Absent => {}
        TriggerBody::Text(s) => builder = builder.body(Bytes::from(s.clone())),
        TriggerBody::Base64(s) => {
            let raw = BASE64.decode(s).map_err(|e| {
                GateError::malformed(format!("trigger body flagged base64 but undecodable: {e}"))
            })?;
            builder = builder.body(Bytes::from(raw));
        }
    }

    builder.build()
}

/// Encode a canonical response into a typed trigger response.
///
/// Goes through [`TriggerResponse::builder`], the only constructor the
/// native shape admits. Text bodies travel as text; binary bodies travel
/// base64 unless the declared content type is textual and the bytes are
/// valid UTF-8.
///
/// # Errors
///
/// Returns [`GateError::InvalidResponse`] if the builder refuses the
/// response, which cannot happen for a finalized canonical response.
pub fn encode(resp: &CanonicalResponse) -> GateResult<TriggerResponse> {
    let mut builder = TriggerResponse::builder().status(resp.status().as_u16());

    let mut saw_content_type = false;
    for (name, value) in resp.headers() {
        let Ok(value) = value.to_str() else {
            continue;
        };
        saw_content_type |= *name == http::header::CONTENT_TYPE;
        builder = builder.header(name.as_str(), value);
    }
    if let Some(ct) = resp.content_type() {
        if !saw_content_type {
            builder = builder.header("content-type", ct);
        }
    }

    let body = match resp.body() {
        None => TriggerBody::Absent,
        Some(ResponseBody::Text(s)) => TriggerBody::Text(s.clone()),
        Some(ResponseBody::Binary(b)) => {
            let textual = resp.content_type().is_some_and(is_textual_content_type);
            match std::str::from_utf8(b) {
                Ok(s) if textual => TriggerBody::Text(s.to_owned()),
                _ => TriggerBody::Base64(BASE64.encode(b)),
            }
        }
    };

    builder.body(body).build()
}

/// Split a trigger URL into its path and optional raw query string.
///
/// Accepts both full URLs (`scheme://host/path?q`) and bare paths
/// (`/path?q`); a full URL with no path component yields `/`.
fn split_url(url: &str) -> (&str, Option<&str>) {
    let after_scheme = url
        .split_once("://")
        .map_or(url, |(_, rest)| rest.find('/').map_or("/", |i| &rest[i..]));
    match after_scheme.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (after_scheme, None),
    }
}
