//! CORS policy for the browser editor.

use actix_cors::Cors;

/// Build the CORS middleware for the configured origins.
///
/// `*` anywhere in the list allows any origin. Credentials, all methods and
/// all request headers are accepted.
pub fn build_cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600);

    if allowed_origins.iter().any(|origin| origin == "*") {
        cors = cors.allow_any_origin();
        tracing::debug!("CORS: Allowing any origin");
    } else {
        for origin in allowed_origins {
            cors = cors.allowed_origin(origin);
        }
        tracing::debug!("CORS: Allowed origins: {:?}", allowed_origins);
    }

    cors
}
