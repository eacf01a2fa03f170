//! Handler trait and request dispatch.
//!
//! [`Dispatcher::dispatch`] is the single entry point every hosting front
//! funnels through. It is infallible by design: route misses become 404/405
//! responses, handler failures become generic 500s reported to the
//! [`FailureObserver`], and nothing ever propagates to a provider adapter
//! as a raw error.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use faasgate_model::{CanonicalRequest, CanonicalResponse};
use http::Method;

use crate::table::{RouteMatch, RouteTable};

/// Boxed future returned by handlers.
pub type HandlerFuture =
    Pin<Box<dyn Future<Output = Result<CanonicalResponse, anyhow::Error>> + Send>>;

/// Trait that the business logic collaborator implements.
///
/// This is the boundary between the dispatch core and whatever framework the
/// application plugs in behind it. Handlers receive the canonical request
/// and either return a canonical response or fail with any error; the
/// dispatcher owns the conversion of failures into 500s.
pub trait Handler: Send + Sync + 'static {
    /// Handle a canonical request.
    fn handle(&self, req: CanonicalRequest) -> HandlerFuture;
}

/// Adapter turning an async closure into a [`Handler`].
pub struct FnHandler<F> {
    f: F,
}

impl<F> std::fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(CanonicalRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<CanonicalResponse, anyhow::Error>> + Send + 'static,
{
    fn handle(&self, req: CanonicalRequest) -> HandlerFuture {
        Box::pin((self.f)(req))
    }
}

/// Wrap an async closure as a [`Handler`].
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(CanonicalRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<CanonicalResponse, anyhow::Error>> + Send + 'static,
{
    FnHandler { f }
}

/// A structured record of a handler failure, as handed to the
/// [`FailureObserver`]. Failure detail stays on this side of the boundary;
/// the caller only ever sees the generic 500 body.
#[derive(Debug)]
pub struct FailureRecord<'a> {
    /// Method of the failing request.
    pub method: &'a Method,
    /// Path of the failing request.
    pub path: &'a str,
    /// The failure raised by the handler.
    pub error: &'a anyhow::Error,
}

/// Logging collaborator that receives handler failure records.
pub trait FailureObserver: Send + Sync {
    /// Called exactly once per handler failure converted to a 500.
    fn handler_failure(&self, record: &FailureRecord<'_>);
}

/// Default observer that reports failures through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFailureObserver;

impl FailureObserver for TracingFailureObserver {
    fn handler_failure(&self, record: &FailureRecord<'_>) {
        tracing::error!(
            method = %record.method,
            path = %record.path,
            error = %record.error,
            "handler failed, returning 500",
        );
    }
}

/// Resolves canonical requests against a published [`RouteTable`] and runs
/// the matched handler.
///
/// `dispatch` is reentrant and side-effect-free on the table; any number of
/// invocations may run concurrently once the table is published.
pub struct Dispatcher {
    table: Arc<RouteTable>,
    observer: Arc<dyn FailureObserver>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.table.len())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Create a dispatcher over a published table, reporting failures
    /// through [`TracingFailureObserver`].
    #[must_use]
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self::with_observer(table, Arc::new(TracingFailureObserver))
    }

    /// Create a dispatcher with a custom failure observer.
    #[must_use]
    pub fn with_observer(table: Arc<RouteTable>, observer: Arc<dyn FailureObserver>) -> Self {
        Self { table, observer }
    }

    /// The table this dispatcher resolves against.
    #[must_use]
    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    /// Dispatch a canonical request to its handler.
    ///
    /// Always produces a well-formed canonical response: 404 when no pattern
    /// matches the path, 405 (with a sorted `Allow` header) when the path
    /// matches but the method does not, the handler's own response on
    /// success, and a generic 500 when the handler fails.
    pub async fn dispatch(&self, req: CanonicalRequest) -> CanonicalResponse {
        let outcome = self.table.resolve(req.path(), req.method());
        match outcome {
            RouteMatch::NotFound => {
                tracing::debug!(method = %req.method(), path = %req.path(), "no route matched");
                canned(404, "no route matches the requested path")
            }
            RouteMatch::MethodNotAllowed(methods) => {
                tracing::debug!(
                    method = %req.method(),
                    path = %req.path(),
                    allowed = ?methods,
                    "method not allowed",
                );
                let allow = methods
                    .iter()
                    .map(Method::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                CanonicalResponse::builder()
                    .status(405)
                    .header(http::header::ALLOW.as_str(), allow)
                    .content_type("text/plain")
                    .text("method not allowed for the requested path")
                    .build()
                    .expect("statically valid 405 response")
            }
            RouteMatch::Matched(route) => {
                tracing::debug!(
                    method = %req.method(),
                    path = %req.path(),
                    pattern = %route.pattern(),
                    "dispatching to handler",
                );
                let method = req.method().clone();
                let path = req.path().to_owned();
                match route.handler().handle(req).await {
                    Ok(resp) => resp,
                    Err(error) => {
                        self.observer.handler_failure(&FailureRecord {
                            method: &method,
                            path: &path,
                            error: &error,
                        });
                        canned(500, "internal error")
                    }
                }
            }
        }
    }
}

/// Build a fixed text response with a status code known to be valid.
fn canned(status: u16, body: &str) -> CanonicalResponse {
    CanonicalResponse::builder()
        .status(status)
        .content_type("text/plain")
        .text(body)
        .build()
        .expect("statically valid canned response")
}
