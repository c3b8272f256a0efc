//! Chat HTTP routes.

use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::Deserialize;

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::player_identity::PlayerIdentity;
use crate::extractors::room_id::RoomId;
use crate::realtime::broker::RoomEvent;
use crate::services::chat::ChatService;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
struct PostMessageRequest {
    body: String,
}

/// POST /api/rooms/{room_id}/chat
async fn post_message(
    http_req: HttpRequest,
    room_id: RoomId,
    identity: PlayerIdentity,
    body: web::Json<PostMessageRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let service = ChatService;
    let id = room_id.0;
    let text = body.into_inner().body;

    let message = with_txn(Some(&http_req), &app_state, |txn| {
        let service = service;
        let identity = identity.clone();
        let text = text.clone();
        Box::pin(async move { service.post_message(txn, id, &identity, &text).await })
    })
    .await?;

    app_state.broker.publish(RoomEvent::ChatPosted {
        room_id: id,
        message_id: message.id,
    });
    Ok(HttpResponse::Created().json(message))
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<u64>,
}

/// GET /api/rooms/{room_id}/chat
async fn list_messages(
    http_req: HttpRequest,
    room_id: RoomId,
    query: web::Query<HistoryQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let service = ChatService;
    let id = room_id.0;
    let limit = query.limit;

    let messages = with_txn(Some(&http_req), &app_state, |txn| {
        let service = service;
        Box::pin(async move { service.list_messages(txn, id, limit).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(messages))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/rooms/{room_id}/chat")
            .route(web::post().to(post_message))
            .route(web::get().to(list_messages)),
    );
}
