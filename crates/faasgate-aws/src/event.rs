//! Wire shapes of the gateway-proxy invocation.
//!
//! The provider delivers the entire request as one structured JSON event and
//! expects one structured JSON result back; there is no streaming. Header
//! and query maps exist in both single-value and multi-value forms depending
//! on the gateway configuration, so both are modeled and merged on decode.

use std::collections::{BTreeMap, HashMap};

use faasgate_model::{GateError, GateResult};
use serde::{Deserialize, Serialize};

/// Inbound gateway-proxy event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayProxyEvent {
    /// HTTP verb; absence makes the event undispatchable.
    pub http_method: Option<String>,
    /// Request path, possibly carrying the deployment stage prefix.
    pub path: Option<String>,
    /// Single-value header map (older gateway payloads).
    pub headers: Option<HashMap<String, String>>,
    /// Multi-value header map; wins over `headers` for shared names.
    pub multi_value_headers: Option<HashMap<String, Vec<String>>>,
    /// Single-value query parameters.
    pub query_string_parameters: Option<HashMap<String, String>>,
    /// Multi-value query parameters; wins over the single-value map.
    pub multi_value_query_string_parameters: Option<HashMap<String, Vec<String>>>,
    /// Invocation-stage context.
    pub request_context: Option<GatewayRequestContext>,
    /// Whether `body` is base64-encoded binary rather than text.
    pub is_base64_encoded: bool,
    /// Request payload; `null` means no body at all.
    pub body: Option<String>,
}

/// Subset of the gateway request context the adapter cares about.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayRequestContext {
    /// Deployment stage name embedded as a path prefix (e.g. `prod`).
    pub stage: Option<String>,
}

impl GatewayProxyEvent {
    /// Parse an event from raw JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::MalformedInvocation`] when the payload is not
    /// valid JSON for this shape.
    pub fn from_json(raw: &[u8]) -> GateResult<Self> {
        serde_json::from_slice(raw)
            .map_err(|e| GateError::malformed(format!("undecodable gateway event: {e}")))
    }
}

/// Outbound gateway-proxy result envelope.
///
/// The gateway requires `statusCode` as an integer and a `body` that is
/// either raw text or base64 text, gated by `isBase64Encoded`. Both header
/// map forms are emitted; ordered maps keep the serialized envelope
/// deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayProxyResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// First value of each response header.
    pub headers: BTreeMap<String, String>,
    /// All values of each response header.
    pub multi_value_headers: BTreeMap<String, Vec<String>>,
    /// Response payload, text or base64 per `is_base64_encoded`.
    pub body: Option<String>,
    /// Whether `body` holds base64-encoded binary.
    pub is_base64_encoded: bool,
}

impl GatewayProxyResponse {
    /// Serialize the envelope to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidResponse`] when serialization fails,
    /// which for this shape cannot happen in practice.
    pub fn to_json(&self) -> GateResult<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| GateError::InvalidResponse(format!("unserializable envelope: {e}")))
    }
}
