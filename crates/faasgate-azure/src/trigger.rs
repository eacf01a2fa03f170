//! Typed trigger request/response objects.
//!
//! This provider hands the function a typed request object and expects a
//! typed response object back, constructed through a builder that refuses
//! to produce a response when required fields are missing.

use std::collections::BTreeMap;

use faasgate_model::{GateError, GateResult};
use serde::{Deserialize, Serialize};

/// Tri-state trigger payload.
///
/// `Absent` is distinct from empty text; the distinction survives decoding
/// into the canonical model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum TriggerBody {
    /// No payload was delivered.
    #[default]
    Absent,
    /// UTF-8 text payload.
    Text(String),
    /// Base64-encoded binary payload.
    Base64(String),
}

/// Inbound typed trigger request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerRequest {
    /// HTTP verb; case-insensitive.
    pub method: String,
    /// Either a full URL (`https://host/api/x?q=1`) or a bare
    /// path-and-query (`/api/x?q=1`).
    pub url: String,
    /// Header map, one entry per name with all its values.
    #[serde(default)]
    pub headers: BTreeMap<String, Vec<String>>,
    /// Request payload.
    #[serde(default)]
    pub body: TriggerBody,
}

/// Outbound typed trigger response. Only constructible through
/// [`TriggerResponse::builder`], which enforces the required fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResponse {
    /// HTTP status code.
    pub status: u16,
    /// Header map, one entry per name with all its values.
    pub headers: BTreeMap<String, Vec<String>>,
    /// Response payload.
    pub body: TriggerBody,
}

impl TriggerResponse {
    /// Start building a response.
    #[must_use]
    pub fn builder() -> TriggerResponseBuilder {
        TriggerResponseBuilder::default()
    }
}

/// Builder for [`TriggerResponse`].
///
/// The status is a required field: [`build`](Self::build) refuses to
/// construct a response without one, so a partially-built object can never
/// escape to the provider runtime.
#[derive(Debug, Default)]
pub struct TriggerResponseBuilder {
    status: Option<u16>,
    headers: BTreeMap<String, Vec<String>>,
    body: TriggerBody,
}

impl TriggerResponseBuilder {
    /// Set the status code (required).
    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Append a header value.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.entry(name.into()).or_default().push(value.into());
        self
    }

    /// Set the payload.
    #[must_use]
    pub fn body(mut self, body: TriggerBody) -> Self {
        self.body = body;
        self
    }

    /// Construct the response.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidResponse`] when no status was set or the
    /// status lies outside 100..=599.
    pub fn build(self) -> GateResult<TriggerResponse> {
        let status = self.status.ok_or_else(|| {
            GateError::InvalidResponse("trigger response requires a status".to_owned())
        })?;
        if !(100..=599).contains(&status) {
            return Err(GateError::invalid_status(status));
        }
        Ok(TriggerResponse {
            status,
            headers: self.headers,
            body: self.body,
        })
    }
}
