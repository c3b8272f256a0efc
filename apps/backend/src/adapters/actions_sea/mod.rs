//! SeaORM adapter for the round_actions ledger - generic over ConnectionTrait.
//!
//! Inserts rely on the (room_id, round, actor_id) unique index; a violation
//! surfaces as a DbErr which the repos layer maps to ActionAlreadySubmitted.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::round_actions;

pub async fn create_action<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    round: i16,
    actor_id: i64,
    action_kind: round_actions::ActionKind,
    target_id: i64,
) -> Result<round_actions::Model, sea_orm::DbErr> {
    let action_active = round_actions::ActiveModel {
        id: NotSet,
        room_id: Set(room_id),
        round: Set(round),
        actor_id: Set(actor_id),
        action_kind: Set(action_kind),
        target_id: Set(target_id),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };

    action_active.insert(conn).await
}

/// The round's ledger in submission order.
pub async fn find_all_by_room_and_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    round: i16,
) -> Result<Vec<round_actions::Model>, sea_orm::DbErr> {
    round_actions::Entity::find()
        .filter(round_actions::Column::RoomId.eq(room_id))
        .filter(round_actions::Column::Round.eq(round))
        .order_by_asc(round_actions::Column::Id)
        .all(conn)
        .await
}

pub async fn count_by_room_and_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    round: i16,
) -> Result<u64, sea_orm::DbErr> {
    round_actions::Entity::find()
        .filter(round_actions::Column::RoomId.eq(room_id))
        .filter(round_actions::Column::Round.eq(round))
        .count(conn)
        .await
}

/// Every action of one actor with a given kind, across rounds.
///
/// Used for the seer's private reveal history.
pub async fn find_by_actor_and_kind<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    actor_id: i64,
    kind: round_actions::ActionKind,
) -> Result<Vec<round_actions::Model>, sea_orm::DbErr> {
    round_actions::Entity::find()
        .filter(round_actions::Column::RoomId.eq(room_id))
        .filter(round_actions::Column::ActorId.eq(actor_id))
        .filter(round_actions::Column::ActionKind.eq(kind))
        .order_by_asc(round_actions::Column::Round)
        .all(conn)
        .await
}
