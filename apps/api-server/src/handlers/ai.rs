//! AI proxy handlers.

use std::convert::Infallible;

use actix_web::{HttpResponse, http::header, web};
use futures::StreamExt;

use scribe_core::domain::AiAction;
use scribe_shared::dto::{GenerateRequest, GenerateResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/ai/generate
pub async fn generate(
    state: web::Data<AppState>,
    body: web::Json<GenerateRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let action: AiAction = req.action.parse()?;

    let result = state.ai.transform(&req.text, action).await?;

    Ok(HttpResponse::Ok().json(GenerateResponse {
        result,
        streaming: false,
    }))
}

/// POST /api/ai/generate/stream
///
/// Relays model output as server-sent events. The body owns the upstream
/// stream, so a client disconnect closes the upstream request too.
pub async fn generate_stream(
    state: web::Data<AppState>,
    body: web::Json<GenerateRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let action: AiAction = req.action.parse()?;

    let events = state.ai.transform_stream(&req.text, action).await?;

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(events.map(|event| Ok::<_, Infallible>(web::Bytes::from(event)))))
}
