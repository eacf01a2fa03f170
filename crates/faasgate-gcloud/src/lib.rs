//! Stream-pair adapter for FaasGate.
//!
//! This provider exposes the request as a pull-style object and the
//! response as a push-style output sink. The sink protocol is strict:
//! status and headers go first, the first body byte freezes them, and a
//! sink the runtime already closed quietly discards whatever is left —
//! the adapter degrades to a best-effort (or absent) response rather than
//! surfacing a crash.
//!
//! [`BufferedRequest`]/[`BufferedSink`] are in-memory implementations of
//! the two seam traits, used by hosts and tests alike.

pub mod codec;
pub mod stream;

pub use codec::{decode, encode};
pub use stream::{BufferedRequest, BufferedSink, ClosedSink, PullRequest, ResponseSink};
