//! Error taxonomy for FaasGate.
//!
//! Only two members of this taxonomy are fatal: [`GateError::DuplicateRoute`]
//! and [`GateError::Config`], both of which can occur exclusively at bootstrap
//! time. Everything else is resolved to a well-formed canonical response
//! before it reaches a provider adapter's encode path; a provider runtime
//! never observes a raw failure.

/// Error type shared by the canonical model, the router, and the adapters.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// An adapter could not construct a valid canonical request from the
    /// native payload (missing method, undecodable base64 body, ...).
    /// Surfaces to the provider as a canonical 400-class response.
    #[error("malformed invocation: {0}")]
    MalformedInvocation(String),

    /// The exact (pattern, method) pair was registered twice. Fatal at
    /// bootstrap; aborts route table construction.
    #[error("duplicate route: {method} {pattern}")]
    DuplicateRoute {
        /// The path pattern that was registered twice.
        pattern: String,
        /// The HTTP method of the duplicate registration.
        method: http::Method,
    },

    /// A canonical response failed finalization (out-of-range status code,
    /// unrepresentable header). When raised by a handler this is treated as
    /// a handler failure and converted to a generic 500.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Bootstrap-time configuration error (bad pattern syntax, missing
    /// required binding). Fatal for the process instance.
    #[error("configuration error: {0}")]
    Config(String),
}

impl GateError {
    /// Build a [`GateError::MalformedInvocation`] from any message.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInvocation(msg.into())
    }

    /// Build a [`GateError::InvalidResponse`] for an out-of-range status code.
    #[must_use]
    pub fn invalid_status(status: u16) -> Self {
        Self::InvalidResponse(format!(
            "status code {status} is outside the valid range 100..=599"
        ))
    }

    /// Build a [`GateError::Config`] from any message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Convenience result type for FaasGate operations.
pub type GateResult<T> = Result<T, GateError>;
