//! Persistence: SeaORM repositories for PostgreSQL and in-memory fallbacks.

mod connections;
mod memory;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::DatabaseConfig;
pub use memory::{InMemoryPostRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
pub use connections::connect;
#[cfg(feature = "postgres")]
pub use postgres_repo::{PostgresPostRepository, PostgresUserRepository};


/// Mask an email address for logging: `alice@x.com` becomes `a***@x.com`.
pub fn mask_email(email: &str) -> String {
    let Some(at_pos) = email.find('@') else {
        return "***".to_string();
    };

    let (local, domain) = email.split_at(at_pos);
    match local.chars().next() {
        Some(first) if local.chars().count() > 1 => format!("{first}***{domain}"),
        _ => format!("***{domain}"),
    }
}

#[cfg(test)]
mod mask_tests {
    use super::mask_email;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@example.com"), "a***@example.com");
        assert_eq!(mask_email("a@example.com"), "***@example.com");
        assert_eq!(mask_email("émile@x.fr"), "é***@x.fr");
        assert_eq!(mask_email("no-at-sign"), "***");
    }
}
