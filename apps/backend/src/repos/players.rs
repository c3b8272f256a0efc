//! Player repository functions for the domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::players_sea as players_adapter;
use crate::entities::room_players;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::infra::db_errors::map_db_err;

pub use players_adapter::PlayerCreate;

pub type RoomPlayer = room_players::Model;

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<RoomPlayer>, DomainError> {
    players_adapter::find_by_id(conn, id).await.map_err(map_db_err)
}

pub async fn require_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<RoomPlayer, DomainError> {
    players_adapter::find_by_id(conn, id)
        .await
        .map_err(map_db_err)?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, format!("Player {id} not found")))
}

pub async fn find_by_room_and_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    player_id: &str,
) -> Result<Option<RoomPlayer>, DomainError> {
    players_adapter::find_by_room_and_player(conn, room_id, player_id)
        .await
        .map_err(map_db_err)
}

/// The identity's seat in the room, or PlayerNotFound.
pub async fn require_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    player_id: &str,
) -> Result<RoomPlayer, DomainError> {
    find_by_room_and_player(conn, room_id, player_id)
        .await?
        .ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Player,
                format!("Player {player_id} is not in room {room_id}"),
            )
        })
}

pub async fn find_all_by_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Vec<RoomPlayer>, DomainError> {
    players_adapter::find_all_by_room(conn, room_id)
        .await
        .map_err(map_db_err)
}

pub async fn create_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PlayerCreate,
) -> Result<RoomPlayer, DomainError> {
    players_adapter::create_player(conn, dto)
        .await
        .map_err(map_db_err)
}

pub async fn refresh_identity<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    name: &str,
    avatar: Option<&str>,
) -> Result<RoomPlayer, DomainError> {
    players_adapter::refresh_identity(conn, id, name, avatar)
        .await
        .map_err(map_db_err)
}

pub async fn update_last_seen<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<(), DomainError> {
    players_adapter::update_last_seen(conn, id)
        .await
        .map_err(map_db_err)
}

pub async fn set_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    role: room_players::PlayerRole,
) -> Result<(), DomainError> {
    players_adapter::set_role(conn, id, role)
        .await
        .map_err(map_db_err)
}

pub async fn set_alive<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    is_alive: bool,
) -> Result<(), DomainError> {
    players_adapter::set_alive(conn, id, is_alive)
        .await
        .map_err(map_db_err)
}

pub async fn set_action_done<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    done: bool,
) -> Result<(), DomainError> {
    players_adapter::set_action_done(conn, id, done)
        .await
        .map_err(map_db_err)
}

pub async fn set_saved<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    saved: bool,
) -> Result<(), DomainError> {
    players_adapter::set_saved(conn, id, saved)
        .await
        .map_err(map_db_err)
}

pub async fn reset_round_flags<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<(), DomainError> {
    players_adapter::reset_round_flags(conn, room_id)
        .await
        .map_err(map_db_err)
}

pub async fn delete_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<(), DomainError> {
    players_adapter::delete_player(conn, id)
        .await
        .map_err(map_db_err)
}
