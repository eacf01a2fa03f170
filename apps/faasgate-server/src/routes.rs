//! Built-in function routes served by the standalone host.

use std::sync::Arc;

use faasgate_model::{CanonicalRequest, CanonicalResponse, GateResult};
use faasgate_router::{RouteTableBuilder, handler_fn};
use http::Method;

/// Register the built-in routes.
///
/// `/api/HttpExample` is the greeting function; `/health` reports liveness;
/// `/api/echo/*` echoes the request back as JSON for debugging clients.
pub fn register(builder: &mut RouteTableBuilder) -> GateResult<()> {
    builder
        .route(
            "/api/HttpExample",
            Method::GET,
            Arc::new(handler_fn(http_example)),
        )?
        .route(
            "/api/HttpExample",
            Method::POST,
            Arc::new(handler_fn(http_example)),
        )?
        .route("/health", Method::GET, Arc::new(handler_fn(health)))?
        .route("/api/echo/*", Method::GET, Arc::new(handler_fn(echo)))?
        .route("/api/echo/*", Method::POST, Arc::new(handler_fn(echo)))?;
    Ok(())
}

/// Greeting function: takes `name` from the query string or the body.
async fn http_example(req: CanonicalRequest) -> anyhow::Result<CanonicalResponse> {
    let name = req
        .query()
        .first("name")
        .map(ToOwned::to_owned)
        .or_else(|| {
            req.body()
                .and_then(|b| std::str::from_utf8(b).ok())
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned)
        })
        .unwrap_or_else(|| "world".to_owned());

    Ok(CanonicalResponse::builder()
        .status(200)
        .content_type("text/plain")
        .text(format!("Hello, {name}!"))
        .build()?)
}

/// Liveness probe.
async fn health(_req: CanonicalRequest) -> anyhow::Result<CanonicalResponse> {
    Ok(CanonicalResponse::builder()
        .status(200)
        .content_type("application/json")
        .text(r#"{"status":"ok"}"#)
        .build()?)
}

/// Echo the request shape back as JSON.
async fn echo(req: CanonicalRequest) -> anyhow::Result<CanonicalResponse> {
    let body = serde_json::json!({
        "method": req.method().as_str(),
        "path": req.path(),
        "query": req.query().iter().collect::<Vec<_>>(),
        "contentType": req.content_type(),
        "bodyBytes": req.body().map_or(0, bytes::Bytes::len),
    });

    Ok(CanonicalResponse::builder()
        .status(200)
        .content_type("application/json")
        .text(body.to_string())
        .build()?)
}
