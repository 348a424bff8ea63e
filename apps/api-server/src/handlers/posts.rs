//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use scribe_core::domain::{Post, PostPatch};
use scribe_shared::dto::{
    CreatePostRequest, DeleteResponse, ListPostsQuery, PostResponse, UpdatePostRequest,
};

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn to_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        status: post.status.to_string(),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

/// POST /api/posts/
pub async fn create_post(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state
        .posts
        .create(identity.0.as_ref(), req.title, req.content)
        .await?;

    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// GET /api/posts/?status_filter=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list(query.status_filter.as_deref()).await?;
    let body: Vec<PostResponse> = posts.into_iter().map(to_response).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// PATCH /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let patch = PostPatch {
        title: req.title,
        content: req.content,
    };
    let post = state.posts.update(path.into_inner(), patch).await?;

    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// POST /api/posts/{id}/publish
pub async fn publish_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.posts.publish(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.posts.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse { ok: true }))
}
