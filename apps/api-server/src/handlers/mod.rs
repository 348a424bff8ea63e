//! HTTP handlers and route configuration.

mod ai;
mod auth;
mod health;
mod posts;


use actix_web::web;

use crate::middleware::error::AppError;

/// Malformed or mistyped JSON bodies are client errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());

    cfg.route("/", web::get().to(health::root)).service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/signup", web::post().to(auth::signup))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Post routes; the collection answers with and without a trailing slash
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/", web::get().to(posts::list_posts))
                    .route("/", web::post().to(posts::create_post))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::patch().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post))
                    .route("/{id}/publish", web::post().to(posts::publish_post)),
            )
            // AI proxy routes
            .service(
                web::scope("/ai")
                    .route("/generate", web::post().to(ai::generate))
                    .route("/generate/stream", web::post().to(ai::generate_stream)),
            ),
    );
}
