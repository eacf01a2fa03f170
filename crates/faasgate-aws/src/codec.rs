//! Gateway event decode / response encode.

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use faasgate_model::{
    CanonicalRequest, CanonicalResponse, GateError, GateResult, QueryMap, ResponseBody,
    decode_path, is_textual_content_type, normalize_path,
};

use crate::event::{GatewayProxyEvent, GatewayProxyResponse};

/// Decode a gateway-proxy event into a canonical request.
///
/// - Method is normalized to uppercase; a missing method is malformed.
/// - The deployment-stage prefix (`/{stage}/...`) is stripped when the
///   request context names a stage the path actually carries.
/// - Single-value and multi-value header/query maps are merged, the
///   multi-value form winning for shared names; merge order is sorted by
///   name so decoding is deterministic regardless of JSON map order.
/// - A `null` body stays absent; a base64-flagged body is decoded to raw
///   bytes, anything else is taken as UTF-8 text.
///
/// # Errors
///
/// Returns [`GateError::MalformedInvocation`] for a missing method, an
/// undecodable base64 body, or headers unrepresentable in HTTP.
pub fn decode(event: &GatewayProxyEvent) -> GateResult<CanonicalRequest> {
    let method = event
        .http_method
        .as_deref()
        .filter(|m| !m.is_empty())
        .ok_or_else(|| GateError::malformed("gateway event carries no httpMethod"))?;

    let raw_path = event.path.as_deref().unwrap_or("");
    let path = normalize_path(&decode_path(strip_stage(raw_path, event)));

    let mut builder = CanonicalRequest::builder().method(method).path(path);

    for (name, values) in merge_multi_maps(
        event.headers.as_ref(),
        event.multi_value_headers.as_ref(),
    ) {
        for value in values {
            builder = builder.header(name.clone(), value);
        }
    }

    let mut query = QueryMap::new();
    for (name, values) in merge_multi_maps(
        event.query_string_parameters.as_ref(),
        event.multi_value_query_string_parameters.as_ref(),
    ) {
        for value in values {
            query.append(name.clone(), value);
        }
    }
    builder = builder.query(query);

    if let Some(raw_body) = &event.body {
        let body = if event.is_base64_encoded {
            Bytes::from(BASE64.decode(raw_body).map_err(|e| {
                GateError::malformed(format!("body flagged base64 but undecodable: {e}"))
            })?)
        } else {
            Bytes::from(raw_body.clone())
        };
        builder = builder.body(body);
    }

    builder.build()
}

/// Encode a canonical response into the gateway result envelope.
///
/// Exactly one body encoding is chosen: text bodies go out verbatim with
/// the flag clear; binary bodies go out base64-encoded with the flag set,
/// unless the declared content type is textual and the bytes are valid
/// UTF-8, in which case they are genuinely text and travel as such.
#[must_use]
pub fn encode(resp: &CanonicalResponse) -> GatewayProxyResponse {
    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    let mut multi_value_headers: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (name, value) in resp.headers() {
        let Ok(value) = value.to_str() else {
            continue;
        };
        let name = name.as_str().to_owned();
        headers.entry(name.clone()).or_insert_with(|| value.to_owned());
        multi_value_headers
            .entry(name)
            .or_default()
            .push(value.to_owned());
    }

    if let Some(ct) = resp.content_type() {
        if !multi_value_headers.contains_key("content-type") {
            headers.insert("content-type".to_owned(), ct.to_owned());
            multi_value_headers.insert("content-type".to_owned(), vec![ct.to_owned()]);
        }
    }

    let (body, is_base64_encoded) = match resp.body() {
        None => (None, false),
        Some(ResponseBody::Text(s)) => (Some(s.clone()), false),
        Some(ResponseBody::Binary(b)) => {
            let textual = resp.content_type().is_some_and(is_textual_content_type);
            match std::str::from_utf8(b) {
                Ok(s) if textual => (Some(s.to_owned()), false),
                _ => (Some(BASE64.encode(b)), true),
            }
        }
    };

    GatewayProxyResponse {
        status_code: resp.status().as_u16(),
        headers,
        multi_value_headers,
        body,
        is_base64_encoded,
    }
}

/// Strip the stage prefix from the raw path when the event names one.
fn strip_stage<'a>(path: &'a str, event: &GatewayProxyEvent) -> &'a str {
    let Some(stage) = event
        .request_context
        .as_ref()
        .and_then(|c| c.stage.as_deref())
        .filter(|s| !s.is_empty())
    else {
        return path;
    };
    match path.strip_prefix('/').and_then(|p| p.strip_prefix(stage)) {
        Some("") => "/",
        Some(rest) if rest.starts_with('/') => rest,
        _ => path,
    }
}

/// Merge a single-value map with a multi-value map, the latter winning.
///
/// Output is sorted by name so header/query insertion order is stable.
fn merge_multi_maps(
    single: Option<&std::collections::HashMap<String, String>>,
    multi: Option<&std::collections::HashMap<String, Vec<String>>>,
) -> BTreeMap<String, Vec<String>> {
    let mut merged: BTreeMap<String, Vec<String>> = BTreeMap::new();
    if let Some(single) = single {
        for (name, value) in single {
            merged.insert(name.clone(), vec![value.clone()]);
        }
    }
    if let Some(multi) = multi {
        for (name, values) in multi {
            merged.insert(name.clone(), values.clone());
        }
    }
    merged
}
