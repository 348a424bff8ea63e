//! # Scribe Shared
//!
//! Wire types for the HTTP API: request and response bodies, plus the
//! RFC 7807 error envelope.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
