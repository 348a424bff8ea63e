//! Authentication extractors.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;

use scribe_core::domain::User;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Authenticated user extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.user.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user: User,
}

/// Optional identity extractor - doesn't fail if not authenticated.
#[derive(Debug, Clone)]
pub struct OptionalIdentity(pub Option<User>);

/// Raw token from an `Authorization: Bearer <token>` header, if any.
/// The scheme name is matched case-insensitively.
fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;

    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

fn app_state(req: &HttpRequest) -> Option<web::Data<AppState>> {
    let state = req.app_data::<web::Data<AppState>>().cloned();
    if state.is_none() {
        tracing::error!("AppState not found in app data");
    }
    state
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = app_state(req);
        let token = bearer_token(req);

        Box::pin(async move {
            let state = state
                .ok_or_else(|| AppError::Internal("Server configuration error".to_string()))?;

            let user = state.auth.resolve_required(token.as_deref()).await?;
            Ok(Identity { user })
        })
    }
}

impl FromRequest for OptionalIdentity {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = app_state(req);
        let token = bearer_token(req);

        Box::pin(async move {
            let Some(state) = state else {
                return Ok(OptionalIdentity(None));
            };

            Ok(OptionalIdentity(
                state.auth.resolve_optional(token.as_deref()).await,
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn token_for(value: &str) -> Option<String> {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, value))
            .to_http_request();
        bearer_token(&req)
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(token_for("Bearer abc").as_deref(), Some("abc"));
        assert_eq!(token_for("bearer abc").as_deref(), Some("abc"));
        assert_eq!(token_for("BEARER  abc ").as_deref(), Some("abc"));
        assert_eq!(token_for("Basic abc"), None);
        assert_eq!(token_for("Bearer"), None);
        assert_eq!(token_for("Bearer "), None);
    }
}
