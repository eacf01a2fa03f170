//! Integration tests for the FaasGate dispatch core.
//!
//! These tests exercise the full pipeline in-process: a provider-shaped
//! invocation is decoded into the canonical model, dispatched against a
//! route table, and the canonical response encoded back into the provider's
//! native shape. A separate module boots the standalone hyper host on an
//! ephemeral port and talks to it over a real socket.

use std::sync::Arc;
use std::sync::Once;

use faasgate_model::{CanonicalRequest, CanonicalResponse, GateResult};
use faasgate_router::{Dispatcher, FailureObserver, FailureRecord, RouteTableBuilder, handler_fn};
use http::Method;
use parking_lot::Mutex;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Register the routes every pipeline test dispatches against.
///
/// `/api/HttpExample` greets by query parameter, `/api/upload` returns a
/// fixed binary payload, `/files/*` echoes the matched path, and `/boom`
/// always fails.
pub fn register_test_routes(builder: &mut RouteTableBuilder) -> GateResult<()> {
    builder
        .route(
            "/api/HttpExample",
            Method::GET,
            Arc::new(handler_fn(|req: CanonicalRequest| async move {
                let name = req.query().first("name").unwrap_or("world").to_owned();
                Ok(CanonicalResponse::builder()
                    .status(200)
                    .content_type("text/plain")
                    .text(format!("Hello, {name}!"))
                    .build()?)
            })),
        )?
        .route(
            "/api/upload",
            Method::POST,
            Arc::new(handler_fn(|req: CanonicalRequest| async move {
                let received = req.body().map_or(0, bytes::Bytes::len);
                Ok(CanonicalResponse::builder()
                    .status(200)
                    .content_type("application/octet-stream")
                    .header("x-received-bytes", received.to_string())
                    .binary(vec![0xde, 0xad, 0xbe, 0xef])
                    .build()?)
            })),
        )?
        .route(
            "/files/*",
            Method::GET,
            Arc::new(handler_fn(|req: CanonicalRequest| async move {
                Ok(CanonicalResponse::builder()
                    .status(200)
                    .content_type("text/plain")
                    .text(req.path().to_owned())
                    .build()?)
            })),
        )?
        .route(
            "/boom",
            Method::GET,
            Arc::new(handler_fn(|_req| async {
                Err(anyhow::anyhow!("backing store unavailable"))
            })),
        )?;
    Ok(())
}

/// Failure observer that records every report for assertions.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    records: Mutex<Vec<String>>,
}

impl RecordingObserver {
    /// Recorded failure lines, `"METHOD path: error"`.
    #[must_use]
    pub fn records(&self) -> Vec<String> {
        self.records.lock().clone()
    }
}

impl FailureObserver for RecordingObserver {
    fn handler_failure(&self, record: &FailureRecord<'_>) {
        self.records
            .lock()
            .push(format!("{} {}: {}", record.method, record.path, record.error));
    }
}

/// Build a dispatcher over the shared test routes, returning the observer
/// it reports handler failures to.
#[must_use]
pub fn test_dispatcher() -> (Dispatcher, Arc<RecordingObserver>) {
    init_tracing();

    let mut builder = faasgate_router::RouteTable::builder();
    register_test_routes(&mut builder).expect("test routes are valid");
    let observer = Arc::new(RecordingObserver::default());
    let dispatcher = Dispatcher::with_observer(Arc::new(builder.build()), Arc::clone(&observer) as _);
    (dispatcher, observer)
}

/// Build a canonical request directly, bypassing the provider adapters.
#[must_use]
pub fn canonical_request(method: Method, path: &str) -> CanonicalRequest {
    CanonicalRequest::builder()
        .method(method.as_str())
        .path(path)
        .build()
        .expect("test request is valid")
}

mod test_dispatch;
mod test_host;
mod test_registry;
mod test_stream;
mod test_trigger;
