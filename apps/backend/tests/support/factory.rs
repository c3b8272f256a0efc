//! Test data factories: rooms, seats, role fixing, clock skewing.

use backend::entities::room_players::PlayerRole;
use backend::entities::{room_players, rooms};
use backend::extractors::player_identity::PlayerIdentity;
use backend::repos::rooms::Room;
use backend::repos::{players, rooms as rooms_repo};
use backend::services::rooms::RoomService;
use backend::{AppError, GameConfig};
use sea_orm::{ActiveModelTrait, DatabaseTransaction, Set};
use time::OffsetDateTime;

pub fn identity(n: usize) -> PlayerIdentity {
    PlayerIdentity {
        player_id: format!("user-{n}"),
        name: format!("Player {n}"),
        avatar: None,
    }
}

/// Create a room hosted by identity 1 and seat `count` humans total.
pub async fn setup_room_with_humans(
    txn: &DatabaseTransaction,
    config: &GameConfig,
    count: usize,
) -> Result<(Room, Vec<PlayerIdentity>), AppError> {
    let identities: Vec<PlayerIdentity> = (1..=count).map(identity).collect();
    let service = RoomService::new(config.clone());

    let room = service.create_room(txn, &identities[0]).await?;
    for joiner in &identities[1..] {
        service.join_room(txn, &room.code, joiner).await?;
    }

    let room = rooms_repo::require_room(txn, room.id).await?;
    Ok((room, identities))
}

/// Pin specific roles onto seats, overriding whatever the shuffle dealt.
pub async fn force_roles(
    txn: &DatabaseTransaction,
    room_id: i64,
    assignments: &[(&str, PlayerRole)],
) -> Result<(), AppError> {
    for (player_id, role) in assignments {
        let member = players::require_member(txn, room_id, player_id).await?;
        players::set_role(txn, member.id, *role).await?;
    }
    Ok(())
}

pub async fn member_id(
    txn: &DatabaseTransaction,
    room_id: i64,
    player_id: &str,
) -> Result<i64, AppError> {
    Ok(players::require_member(txn, room_id, player_id).await?.id)
}

/// Age a player's heartbeat by `secs` seconds.
pub async fn make_stale(
    txn: &DatabaseTransaction,
    member_id: i64,
    secs: i64,
) -> Result<(), AppError> {
    let member = players::require_player(txn, member_id).await?;
    let mut active: room_players::ActiveModel = member.into();
    active.last_seen = Set(OffsetDateTime::now_utc() - time::Duration::seconds(secs));
    active
        .update(txn)
        .await
        .map_err(|e| AppError::db(e.to_string()))?;
    Ok(())
}

/// Backdate the room's stage deadline so it reads as elapsed.
pub async fn expire_deadline(txn: &DatabaseTransaction, room_id: i64) -> Result<(), AppError> {
    let room = backend::adapters::rooms_sea::require_room(txn, room_id)
        .await
        .map_err(|e| AppError::db(e.to_string()))?;
    let mut active: rooms::ActiveModel = room.into();
    active.stage_deadline = Set(Some(OffsetDateTime::now_utc() - time::Duration::seconds(1)));
    active
        .update(txn)
        .await
        .map_err(|e| AppError::db(e.to_string()))?;
    Ok(())
}

