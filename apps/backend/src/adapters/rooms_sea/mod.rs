//! SeaORM adapter for the rooms table - generic over ConnectionTrait.

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set};

use crate::entities::rooms;

pub mod dto;

pub use dto::{RoomCreate, RoomUpdate};

// Adapter functions return DbErr; the repos layer maps to DomainError.

/// Helper: Apply optimistic update with lock version check, then refetch.
///
/// - Adds lock_version increment and updated_at to the update
/// - Filters by id and current lock_version
/// - Checks rows_affected to distinguish NotFound vs OptimisticLock
/// - Refetches and returns the updated model
///
/// The caller provides a closure that configures entity-specific columns.
async fn optimistic_update_then_fetch<C, F>(
    conn: &C,
    id: i64,
    current_lock_version: i32,
    configure_update: F,
) -> Result<rooms::Model, sea_orm::DbErr>
where
    C: ConnectionTrait + Send + Sync,
    F: FnOnce(sea_orm::UpdateMany<rooms::Entity>) -> sea_orm::UpdateMany<rooms::Entity>,
{
    use sea_orm::sea_query::Expr;

    let now = time::OffsetDateTime::now_utc();

    let result = configure_update(rooms::Entity::update_many())
        .col_expr(rooms::Column::UpdatedAt, Expr::val(now).into())
        .col_expr(
            rooms::Column::LockVersion,
            Expr::col(rooms::Column::LockVersion).add(1),
        )
        .filter(rooms::Column::Id.eq(id))
        .filter(rooms::Column::LockVersion.eq(current_lock_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        // Either the room doesn't exist or the lock version doesn't match
        let room = rooms::Entity::find_by_id(id).one(conn).await?;
        if let Some(room) = room {
            let payload = format!(
                "OPTIMISTIC_LOCK:{{\"expected\":{},\"actual\":{}}}",
                current_lock_version, room.lock_version
            );
            return Err(sea_orm::DbErr::Custom(payload));
        } else {
            return Err(sea_orm::DbErr::Custom(format!("ROOM_NOT_FOUND:{id}")));
        }
    }

    rooms::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| sea_orm::DbErr::Custom(format!("ROOM_NOT_FOUND:{id}")))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Option<rooms::Model>, sea_orm::DbErr> {
    rooms::Entity::find_by_id(room_id).one(conn).await
}

/// Find room by ID or return a structured not-found error.
pub async fn require_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<rooms::Model, sea_orm::DbErr> {
    find_by_id(conn, room_id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::Custom(format!("ROOM_NOT_FOUND:{room_id}")))
}

pub async fn find_by_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<Option<rooms::Model>, sea_orm::DbErr> {
    rooms::Entity::find()
        .filter(rooms::Column::Code.eq(code))
        .one(conn)
        .await
}

pub async fn create_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RoomCreate,
) -> Result<rooms::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let room_active = rooms::ActiveModel {
        id: NotSet,
        code: Set(dto.code),
        stage: Set(rooms::RoomStage::Waiting),
        round: Set(1),
        host_id: Set(dto.host_id),
        roles_assigned: Set(false),
        winner: NotSet,
        rng_seed: Set(dto.rng_seed),
        stage_deadline: NotSet,
        last_outcome: NotSet,
        lock_version: Set(1),
        created_at: Set(now),
        updated_at: Set(now),
        ended_at: NotSet,
    };

    room_active.insert(conn).await
}

pub async fn update_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RoomUpdate,
) -> Result<rooms::Model, sea_orm::DbErr> {
    use sea_orm::sea_query::{Alias, Expr};

    optimistic_update_then_fetch(conn, dto.id, dto.current_lock_version, |mut update| {
        if let Some(stage) = dto.stage {
            update = update.col_expr(
                rooms::Column::Stage,
                Expr::val(stage).cast_as(Alias::new("room_stage")),
            );
        }
        if let Some(round) = dto.round {
            update = update.col_expr(rooms::Column::Round, Expr::val(round).into());
        }
        if let Some(assigned) = dto.roles_assigned {
            update = update.col_expr(rooms::Column::RolesAssigned, Expr::val(assigned).into());
        }
        if let Some(host_id) = dto.host_id {
            update = update.col_expr(rooms::Column::HostId, Expr::val(host_id).into());
        }
        if let Some(winner) = dto.winner {
            update = update.col_expr(
                rooms::Column::Winner,
                Expr::val(winner).cast_as(Alias::new("faction")),
            );
        }
        if let Some(deadline) = dto.stage_deadline {
            update = update.col_expr(rooms::Column::StageDeadline, Expr::val(deadline).into());
        }
        if let Some(outcome) = dto.last_outcome {
            update = update.col_expr(rooms::Column::LastOutcome, Expr::val(outcome).into());
        }
        if let Some(ended_at) = dto.ended_at {
            update = update.col_expr(rooms::Column::EndedAt, Expr::val(ended_at).into());
        }
        update
    })
    .await
}

/// Bump lock_version without changing room fields.
///
/// Used when related rows (players, chat) change in a way that should fan out
/// a fresh snapshot to subscribed clients.
pub async fn touch_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    current_lock_version: i32,
) -> Result<rooms::Model, sea_orm::DbErr> {
    optimistic_update_then_fetch(conn, room_id, current_lock_version, |update| update).await
}

/// Rooms whose stage deadline has elapsed (candidates for forced resolution).
pub async fn find_past_deadline<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    now: time::OffsetDateTime,
) -> Result<Vec<rooms::Model>, sea_orm::DbErr> {
    rooms::Entity::find()
        .filter(rooms::Column::StageDeadline.is_not_null())
        .filter(rooms::Column::StageDeadline.lt(now))
        .all(conn)
        .await
}

/// All rooms that have not reached the terminal stage.
pub async fn find_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<rooms::Model>, sea_orm::DbErr> {
    rooms::Entity::find()
        .filter(rooms::Column::Stage.ne(rooms::RoomStage::Ended))
        .all(conn)
        .await
}
