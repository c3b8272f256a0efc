//! Room-related HTTP routes.
//!
//! Handlers run the service call inside `with_txn` and publish realtime
//! events only after the transaction has committed, so subscribers never see
//! a version that later rolled back.

use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::db::txn::with_txn;
use crate::entities::rooms::{Faction, RoomStage};
use crate::entities::round_actions::ActionKind;
use crate::error::AppError;
use crate::extractors::player_identity::PlayerIdentity;
use crate::extractors::room_id::RoomId;
use crate::repos::rooms::Room;
use crate::services::game_flow::GameFlowService;
use crate::services::presence::PresenceService;
use crate::services::rooms::RoomService;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct RoomStateResponse {
    room_id: i64,
    code: String,
    stage: RoomStage,
    round: i16,
    winner: Option<Faction>,
    lock_version: i32,
}

impl From<Room> for RoomStateResponse {
    fn from(room: Room) -> Self {
        Self {
            room_id: room.id,
            code: room.code,
            stage: room.stage,
            round: room.round,
            winner: room.winner,
            lock_version: room.lock_version,
        }
    }
}

/// POST /api/rooms
///
/// Create a room; the caller becomes host and takes the first seat.
async fn create_room(
    http_req: HttpRequest,
    identity: PlayerIdentity,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let service = RoomService::new(app_state.config.clone());

    let room = with_txn(Some(&http_req), &app_state, |txn| {
        let identity = identity.clone();
        let service = service;
        Box::pin(async move { service.create_room(txn, &identity).await })
    })
    .await?;

    app_state
        .broker
        .publish_room_state(room.id, room.lock_version);
    Ok(HttpResponse::Created().json(RoomStateResponse::from(room)))
}

#[derive(Debug, Deserialize)]
struct JoinRequest {
    code: String,
}

/// POST /api/rooms/join
///
/// Join a room by code, or rejoin an existing seat (idempotent).
async fn join_room(
    http_req: HttpRequest,
    identity: PlayerIdentity,
    body: web::Json<JoinRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let service = RoomService::new(app_state.config.clone());
    let code = body.into_inner().code;

    let room = with_txn(Some(&http_req), &app_state, |txn| {
        let identity = identity.clone();
        let service = service;
        let code = code.clone();
        Box::pin(async move { service.join_room(txn, &code, &identity).await })
    })
    .await?;

    app_state
        .broker
        .publish_room_state(room.id, room.lock_version);
    Ok(HttpResponse::Ok().json(RoomStateResponse::from(room)))
}

/// GET /api/rooms/{room_id}
///
/// Room snapshot. Roles are filtered per viewer; the seer also gets their
/// investigation results.
async fn get_snapshot(
    http_req: HttpRequest,
    room_id: RoomId,
    identity: Option<PlayerIdentity>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let service = RoomService::new(app_state.config.clone());
    let id = room_id.0;

    let snapshot = with_txn(Some(&http_req), &app_state, |txn| {
        let viewer = identity.as_ref().map(|i| i.player_id.clone());
        let service = service;
        Box::pin(async move { service.room_snapshot(txn, id, viewer.as_deref()).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(snapshot))
}

/// POST /api/rooms/{room_id}/start
async fn start_game(
    http_req: HttpRequest,
    room_id: RoomId,
    identity: PlayerIdentity,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let flow = GameFlowService::new(app_state.config.clone());
    let id = room_id.0;

    let room = with_txn(Some(&http_req), &app_state, |txn| {
        let flow = flow;
        let identity = identity.clone();
        Box::pin(async move { flow.start_game(txn, id, &identity.player_id).await })
    })
    .await?;

    app_state
        .broker
        .publish_room_state(room.id, room.lock_version);
    Ok(HttpResponse::Ok().json(RoomStateResponse::from(room)))
}

#[derive(Debug, Deserialize)]
struct ActionRequest {
    kind: ActionKind,
    target_id: i64,
    expected_lock_version: Option<i32>,
}

/// POST /api/rooms/{room_id}/actions
///
/// Submit the caller's action for the current round.
async fn submit_action(
    http_req: HttpRequest,
    room_id: RoomId,
    identity: PlayerIdentity,
    body: web::Json<ActionRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let flow = GameFlowService::new(app_state.config.clone());
    let id = room_id.0;
    let request = body.into_inner();

    let room = with_txn(Some(&http_req), &app_state, |txn| {
        let flow = flow;
        let identity = identity.clone();
        Box::pin(async move {
            flow.submit_action(
                txn,
                id,
                &identity.player_id,
                request.kind,
                request.target_id,
                request.expected_lock_version,
            )
            .await
        })
    })
    .await?;

    app_state
        .broker
        .publish_room_state(room.id, room.lock_version);
    Ok(HttpResponse::Ok().json(RoomStateResponse::from(room)))
}

/// POST /api/rooms/{room_id}/heartbeat
async fn heartbeat(
    http_req: HttpRequest,
    room_id: RoomId,
    identity: PlayerIdentity,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let presence = PresenceService::new(app_state.config.clone());
    let id = room_id.0;

    with_txn(Some(&http_req), &app_state, |txn| {
        let presence = presence;
        let identity = identity.clone();
        Box::pin(async move { presence.heartbeat(txn, id, &identity.player_id).await })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/rooms/{room_id}/leave
async fn leave_room(
    http_req: HttpRequest,
    room_id: RoomId,
    identity: PlayerIdentity,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let service = RoomService::new(app_state.config.clone());
    let id = room_id.0;

    let room = with_txn(Some(&http_req), &app_state, |txn| {
        let service = service;
        let identity = identity.clone();
        Box::pin(async move { service.leave_room(txn, id, &identity).await })
    })
    .await?;

    app_state
        .broker
        .publish_room_state(room.id, room.lock_version);
    Ok(HttpResponse::Ok().json(RoomStateResponse::from(room)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/rooms").route(web::post().to(create_room)));
    cfg.service(web::resource("/api/rooms/join").route(web::post().to(join_room)));
    cfg.service(web::resource("/api/rooms/{room_id}").route(web::get().to(get_snapshot)));
    cfg.service(web::resource("/api/rooms/{room_id}/start").route(web::post().to(start_game)));
    cfg.service(web::resource("/api/rooms/{room_id}/actions").route(web::post().to(submit_action)));
    cfg.service(web::resource("/api/rooms/{room_id}/heartbeat").route(web::post().to(heartbeat)));
    cfg.service(web::resource("/api/rooms/{room_id}/leave").route(web::post().to(leave_room)));
}
