//! Hyper `Service` bridging an HTTP connection to the dispatcher.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, TRANSFER_ENCODING};
use http_body_util::BodyExt;
use hyper::body::Incoming;

use faasgate_model::{
    CanonicalRequest, CanonicalResponse, GateError, GateResult, QueryMap, ResponseBody,
    decode_path,
};
use faasgate_router::Dispatcher;

use crate::body::GateResponseBody;

/// Server identifier stamped on every hosted response.
const SERVER: &str = "FaasGate";

/// Hyper `Service` implementation hosting the dispatcher directly.
///
/// This is the conventional (non-serverless) front: each HTTP request on
/// the connection is collected, decoded into a canonical request,
/// dispatched, and the canonical response encoded back out. The service is
/// cheap to clone and safe to share across connections; all shared state
/// is the published route table behind the dispatcher.
#[derive(Debug)]
pub struct GateHttpService {
    dispatcher: Arc<Dispatcher>,
}

impl GateHttpService {
    /// Create a service over a dispatcher.
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

impl Clone for GateHttpService {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }
}

impl hyper::service::Service<http::Request<Incoming>> for GateHttpService {
    type Response = http::Response<GateResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let dispatcher = Arc::clone(&self.dispatcher);
        let invocation_id = uuid::Uuid::new_v4().to_string();

        Box::pin(async move {
            let response = process_request(req, &dispatcher).await;
            Ok(add_common_headers(response, &invocation_id))
        })
    }
}

/// Run one HTTP request through the full canonical pipeline.
async fn process_request(
    req: http::Request<Incoming>,
    dispatcher: &Dispatcher,
) -> http::Response<GateResponseBody> {
    let (parts, incoming) = req.into_parts();

    let body = match collect_body(incoming).await {
        Ok(body) => body,
        Err(err) => return malformed_response(&err),
    };

    let canonical = match decode_parts(&parts, body) {
        Ok(canonical) => canonical,
        Err(err) => return malformed_response(&err),
    };

    let resp = dispatcher.dispatch(canonical).await;
    encode_response(&resp)
}

/// Collect the incoming body into a single `Bytes` buffer.
async fn collect_body(incoming: Incoming) -> GateResult<Bytes> {
    incoming
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| GateError::malformed(format!("request body unreadable: {e}")))
}

/// Decode hyper request parts plus the collected body into the canonical model.
fn decode_parts(parts: &http::request::Parts, body: Bytes) -> GateResult<CanonicalRequest> {
    let query = parts.uri.query().map(QueryMap::parse).unwrap_or_default();

    // An empty payload on a request that never announced a body counts as
    // "no body", which downstream code can distinguish from an empty one.
    let announced_body =
        parts.headers.contains_key(CONTENT_LENGTH) || parts.headers.contains_key(TRANSFER_ENCODING);
    let body = if body.is_empty() && !announced_body {
        None
    } else {
        Some(body)
    };

    CanonicalRequest::builder()
        .method(parts.method.as_str())
        .path(decode_path(parts.uri.path()))
        .query(query)
        .headers(parts.headers.clone())
        .body(body)
        .build()
}

/// Encode a canonical response as a hyper response.
fn encode_response(resp: &CanonicalResponse) -> http::Response<GateResponseBody> {
    let body = match resp.body() {
        None => GateResponseBody::empty(),
        Some(ResponseBody::Text(s)) => GateResponseBody::from_string(s.clone()),
        Some(ResponseBody::Binary(b)) => GateResponseBody::from_bytes(b.clone()),
    };

    let mut response = http::Response::new(body);
    *response.status_mut() = resp.status();

    let headers = response.headers_mut();
    for (name, value) in resp.headers() {
        headers.append(name.clone(), value.clone());
    }
    if let Some(ct) = resp.content_type() {
        if !headers.contains_key(CONTENT_TYPE) {
            if let Ok(value) = http::HeaderValue::from_str(ct) {
                headers.insert(CONTENT_TYPE, value);
            }
        }
    }

    response
}

/// Turn a decode failure into a 400 response; the native runtime never
/// sees a raw error.
fn malformed_response(err: &GateError) -> http::Response<GateResponseBody> {
    tracing::debug!(error = %err, "rejecting undecodable request");
    encode_response(&faasgate_model::rejection(err))
}

/// Stamp the invocation id and server headers on every hosted response.
fn add_common_headers(
    mut response: http::Response<GateResponseBody>,
    invocation_id: &str,
) -> http::Response<GateResponseBody> {
    let headers = response.headers_mut();
    if let Ok(hv) = http::HeaderValue::from_str(invocation_id) {
        headers.entry("x-faasgate-invocation-id").or_insert(hv);
    }
    headers.insert("server", http::HeaderValue::from_static(SERVER));
    response
}
