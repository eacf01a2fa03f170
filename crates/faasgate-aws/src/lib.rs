//! Gateway-proxy event adapter for FaasGate.
//!
//! This provider delivers the whole request as a single structured JSON
//! event and expects a single structured JSON result back — no streaming in
//! either direction. The adapter is a stateless pair of pure functions:
//!
//! - [`decode`](codec::decode): native event → canonical request, merging
//!   single/multi-value maps, stripping the stage prefix, and honoring the
//!   base64 body flag.
//! - [`encode`](codec::encode): canonical response → result envelope, with
//!   `isBase64Encoded` always consistent with the chosen body encoding.
//!
//! The adapter never invokes the dispatcher itself; the hosting layer wires
//! the two together.

pub mod codec;
pub mod event;

pub use codec::{decode, encode};
pub use event::{GatewayProxyEvent, GatewayProxyResponse, GatewayRequestContext};
