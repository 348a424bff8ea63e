//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod ai;
mod auth;
mod repository;

pub use ai::{AiError, TextGenerator, TextStream};
pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use repository::{BaseRepository, PostRepository, UserRepository};
