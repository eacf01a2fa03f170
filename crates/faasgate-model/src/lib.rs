//! Canonical HTTP model for FaasGate.
//!
//! This crate provides the provider-independent building blocks shared by
//! every FaasGate component: the immutable [`CanonicalRequest`], the
//! builder-constructed [`CanonicalResponse`], the multi-valued [`QueryMap`],
//! and the [`GateError`] taxonomy. Provider adapters translate their native
//! invocation shapes into and out of these types; the router dispatches on
//! them and nothing else.

mod error;
mod query;
mod request;
mod response;

pub use error::{GateError, GateResult};
pub use query::QueryMap;
pub use request::{CanonicalRequest, CanonicalRequestBuilder, decode_path, normalize_path};
pub use response::{
    CanonicalResponse, ResponseBody, ResponseBuilder, is_textual_content_type, rejection,
};
