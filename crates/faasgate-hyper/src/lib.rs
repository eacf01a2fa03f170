//! Conventional HTTP hosting for the dispatch core.
//!
//! This crate fronts a [`faasgate_router::Dispatcher`] with a hyper
//! [`Service`](hyper::service::Service), so the same route table and
//! handlers that serve serverless invocations can also serve a plain
//! long-running HTTP listener. Each connection-level request is decoded
//! into the canonical model, dispatched, and the canonical response
//! encoded back out with an invocation id stamped on it.

pub mod body;
pub mod service;

pub use body::GateResponseBody;
pub use service::GateHttpService;
