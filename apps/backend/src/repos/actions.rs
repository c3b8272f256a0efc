//! Action-ledger repository functions for the domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::actions_sea as actions_adapter;
use crate::entities::round_actions;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;

pub type RoundAction = round_actions::Model;

/// Record an action; a duplicate (room, round, actor) maps to
/// ActionAlreadySubmitted via the unique index.
pub async fn create_action<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    round: i16,
    actor_id: i64,
    kind: round_actions::ActionKind,
    target_id: i64,
) -> Result<RoundAction, DomainError> {
    actions_adapter::create_action(conn, room_id, round, actor_id, kind, target_id)
        .await
        .map_err(map_db_err)
}

pub async fn find_all_by_room_and_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    round: i16,
) -> Result<Vec<RoundAction>, DomainError> {
    actions_adapter::find_all_by_room_and_round(conn, room_id, round)
        .await
        .map_err(map_db_err)
}

pub async fn count_by_room_and_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    round: i16,
) -> Result<u64, DomainError> {
    actions_adapter::count_by_room_and_round(conn, room_id, round)
        .await
        .map_err(map_db_err)
}

pub async fn find_by_actor_and_kind<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    actor_id: i64,
    kind: round_actions::ActionKind,
) -> Result<Vec<RoundAction>, DomainError> {
    actions_adapter::find_by_actor_and_kind(conn, room_id, actor_id, kind)
        .await
        .map_err(map_db_err)
}
