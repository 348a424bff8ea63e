//! Application services - the operations exposed over HTTP, written against ports.

mod ai;
mod auth;
mod posts;

#[cfg(test)]
pub(crate) mod testing;

pub use ai::{AiService, MOCK_MARKER, STREAM_MOCK_TEXT, UNAVAILABLE_MARKER};
pub use auth::{AccessToken, AuthService};
pub use posts::PostService;
