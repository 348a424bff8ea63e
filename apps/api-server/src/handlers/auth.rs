//! Authentication handlers.

use actix_web::{HttpResponse, web};

use scribe_core::services::AccessToken;
use scribe_shared::dto::{LoginRequest, SignupRequest, TokenResponse, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn token_response(token: AccessToken) -> TokenResponse {
    TokenResponse::bearer(token.token, token.expires_in.max(0) as u64)
}

/// POST /api/auth/signup
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let token = state.auth.signup(&req.email, &req.password).await?;

    Ok(HttpResponse::Ok().json(token_response(token)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let token = state.auth.login(&req.email, &req.password).await?;

    Ok(HttpResponse::Ok().json(token_response(token)))
}

/// GET /api/auth/me - Protected route
pub async fn me(identity: Identity) -> AppResult<HttpResponse> {
    let user = identity.user;

    Ok(HttpResponse::Ok().json(UserResponse {
        id: user.id,
        email: user.email,
        created_at: user.created_at,
    }))
}
