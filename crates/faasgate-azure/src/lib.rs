//! Typed HTTP-trigger adapter for FaasGate.
//!
//! This provider invokes the function with a typed request object and
//! expects a builder-constructed typed response object back. The builder
//! enforces its required fields: a response without a status cannot be
//! built, let alone escape to the runtime.
//!
//! Like every FaasGate adapter this one is stateless and consists of two
//! pure functions, [`decode`](codec::decode) and [`encode`](codec::encode);
//! it never calls the dispatcher itself.

pub mod codec;
pub mod trigger;

pub use codec::{decode, encode};
pub use trigger::{TriggerBody, TriggerRequest, TriggerResponse, TriggerResponseBuilder};
