//! # Scribe Core
//!
//! The domain layer of the Scribe blog editor backend.
//! This crate contains business rules and application services with zero
//! infrastructure dependencies; storage, hashing, tokens and the LLM client
//! are reached through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
