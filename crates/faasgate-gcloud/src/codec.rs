//! Stream-pair decode / encode.

use std::io;

use faasgate_model::{
    CanonicalRequest, CanonicalResponse, GateError, GateResult, QueryMap, decode_path,
    normalize_path,
};

use crate::stream::{PullRequest, ResponseSink};

/// Decode a pull-style request into a canonical request.
///
/// Head fields are read first, then the body is pulled exactly once.
///
/// # Errors
///
/// Returns [`GateError::MalformedInvocation`] for an empty method, headers
/// unrepresentable in HTTP, or a body the runtime could not deliver.
pub fn decode(native: &mut dyn PullRequest) -> GateResult<CanonicalRequest> {
    if native.method().is_empty() {
        return Err(GateError::malformed("stream request carries no method"));
    }

    let (raw_path, raw_query) = match native.uri().split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (native.uri(), None),
    };
    let path = normalize_path(&decode_path(raw_path));
    let query = raw_query.map(QueryMap::parse).unwrap_or_default();

    let mut builder = CanonicalRequest::builder()
        .method(native.method())
        .path(path)
        .query(query);
    for (name, value) in native.header_pairs() {
        builder = builder.header(name.clone(), value.clone());
    }

    let body = native
        .read_body()
        .map_err(|e| GateError::malformed(format!("stream request body unreadable: {e}")))?;
    if let Some(body) = body {
        builder = builder.body(body);
    }

    builder.build()
}

/// Encode a canonical response into a push-style sink.
///
/// Status and all headers are pushed strictly before the first body byte,
/// honoring the sink's head-freeze protocol. Encoding is best-effort: when
/// the sink is already closed (the runtime cancelled the invocation, the
/// client went away) the failure is logged and swallowed — there is nobody
/// left to report it to.
pub fn encode(resp: &CanonicalResponse, sink: &mut dyn ResponseSink) {
    if let Err(e) = try_encode(resp, sink) {
        tracing::warn!(
            status = resp.status().as_u16(),
            error = %e,
            "response sink rejected write, dropping remainder",
        );
    }
}

fn try_encode(resp: &CanonicalResponse, sink: &mut dyn ResponseSink) -> io::Result<()> {
    sink.set_status(resp.status().as_u16())?;

    let mut saw_content_type = false;
    for (name, value) in resp.headers() {
        let Ok(value) = value.to_str() else {
            continue;
        };
        saw_content_type |= *name == http::header::CONTENT_TYPE;
        sink.add_header(name.as_str(), value)?;
    }
    if let Some(ct) = resp.content_type() {
        if !saw_content_type {
            sink.add_header("content-type", ct)?;
        }
    }

    if let Some(body) = resp.body() {
        sink.write_body(body.as_bytes())?;
    }
    sink.finish()
}
