//! Route table, dispatcher, and registry bootstrap for FaasGate.
//!
//! This crate is the heart of the system: it resolves a
//! [`CanonicalRequest`](faasgate_model::CanonicalRequest) against the
//! registered route table and runs the matched handler exactly once.
//!
//! - **Patterns** ([`pattern`]): literal path segments plus an optional
//!   trailing `*` wildcard matching one or more segments.
//! - **Table** ([`table`]): immutable-after-build route set with a tagged
//!   [`RouteMatch`](table::RouteMatch) outcome; 404 and 405 are ordinary
//!   variants, never errors.
//! - **Dispatch** ([`dispatch`]): the [`Handler`](dispatch::Handler)
//!   boundary trait, the infallible [`Dispatcher`](dispatch::Dispatcher),
//!   and the [`FailureObserver`](dispatch::FailureObserver) logging
//!   collaborator.
//! - **Registry** ([`registry`]): one-time, race-safe bootstrap publishing
//!   the table for the process lifetime.

pub mod dispatch;
pub mod pattern;
pub mod registry;
pub mod table;

pub use dispatch::{
    Dispatcher, FailureObserver, FailureRecord, FnHandler, Handler, HandlerFuture,
    TracingFailureObserver, handler_fn,
};
pub use pattern::PathPattern;
pub use registry::Registry;
pub use table::{Route, RouteMatch, RouteTable, RouteTableBuilder};
