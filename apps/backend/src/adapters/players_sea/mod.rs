//! SeaORM adapter for the room_players table - generic over ConnectionTrait.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::room_players;

#[derive(Debug, Clone)]
pub struct PlayerCreate {
    pub room_id: i64,
    pub player_id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub is_human: bool,
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<room_players::Model>, sea_orm::DbErr> {
    room_players::Entity::find_by_id(id).one(conn).await
}

pub async fn find_by_room_and_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    player_id: &str,
) -> Result<Option<room_players::Model>, sea_orm::DbErr> {
    room_players::Entity::find()
        .filter(room_players::Column::RoomId.eq(room_id))
        .filter(room_players::Column::PlayerId.eq(player_id))
        .one(conn)
        .await
}

/// All seats of a room, in join order.
pub async fn find_all_by_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Vec<room_players::Model>, sea_orm::DbErr> {
    room_players::Entity::find()
        .filter(room_players::Column::RoomId.eq(room_id))
        .order_by_asc(room_players::Column::JoinedAt)
        .order_by_asc(room_players::Column::Id)
        .all(conn)
        .await
}

pub async fn create_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PlayerCreate,
) -> Result<room_players::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let player_active = room_players::ActiveModel {
        id: NotSet,
        room_id: Set(dto.room_id),
        player_id: Set(dto.player_id),
        name: Set(dto.name),
        avatar: Set(dto.avatar),
        role: NotSet,
        is_alive: Set(true),
        is_action_done: Set(false),
        is_saved: Set(false),
        is_human: Set(dto.is_human),
        joined_at: Set(now),
        last_seen: Set(now),
    };

    player_active.insert(conn).await
}

/// Refresh name/avatar and liveness timestamp on rejoin.
pub async fn refresh_identity<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    name: &str,
    avatar: Option<&str>,
) -> Result<room_players::Model, sea_orm::DbErr> {
    let mut active: room_players::ActiveModel = require_player(conn, id).await?.into();
    active.name = Set(name.to_string());
    active.avatar = Set(avatar.map(str::to_string));
    active.last_seen = Set(time::OffsetDateTime::now_utc());
    active.update(conn).await
}

pub async fn require_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<room_players::Model, sea_orm::DbErr> {
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound(format!("Player {id} not found")))
}

pub async fn update_last_seen<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<(), sea_orm::DbErr> {
    use sea_orm::sea_query::Expr;

    room_players::Entity::update_many()
        .col_expr(
            room_players::Column::LastSeen,
            Expr::val(time::OffsetDateTime::now_utc()).into(),
        )
        .filter(room_players::Column::Id.eq(id))
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn set_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    role: room_players::PlayerRole,
) -> Result<(), sea_orm::DbErr> {
    let mut active: room_players::ActiveModel = require_player(conn, id).await?.into();
    active.role = Set(Some(role));
    active.update(conn).await?;
    Ok(())
}

pub async fn set_alive<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    is_alive: bool,
) -> Result<(), sea_orm::DbErr> {
    let mut active: room_players::ActiveModel = require_player(conn, id).await?.into();
    active.is_alive = Set(is_alive);
    active.update(conn).await?;
    Ok(())
}

pub async fn set_action_done<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    done: bool,
) -> Result<(), sea_orm::DbErr> {
    let mut active: room_players::ActiveModel = require_player(conn, id).await?.into();
    active.is_action_done = Set(done);
    active.update(conn).await?;
    Ok(())
}

pub async fn set_saved<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    saved: bool,
) -> Result<(), sea_orm::DbErr> {
    let mut active: room_players::ActiveModel = require_player(conn, id).await?.into();
    active.is_saved = Set(saved);
    active.update(conn).await?;
    Ok(())
}

/// Clear per-round flags for every living player ahead of the next round.
pub async fn reset_round_flags<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<(), sea_orm::DbErr> {
    use sea_orm::sea_query::Expr;

    room_players::Entity::update_many()
        .col_expr(room_players::Column::IsActionDone, Expr::val(false).into())
        .col_expr(room_players::Column::IsSaved, Expr::val(false).into())
        .filter(room_players::Column::RoomId.eq(room_id))
        .filter(room_players::Column::IsAlive.eq(true))
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn delete_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<(), sea_orm::DbErr> {
    room_players::Entity::delete_by_id(id).exec(conn).await?;
    Ok(())
}
