//! Domain entities - the core business objects.

mod ai;
mod credential;
mod post;
mod user;

pub use ai::AiAction;
pub use credential::HashScheme;
pub use post::{DEFAULT_TITLE, Post, PostPatch, PostStatus};
pub use user::User;
