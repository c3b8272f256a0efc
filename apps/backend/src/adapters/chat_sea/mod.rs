//! SeaORM adapter for the chat_messages table - generic over ConnectionTrait.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::chat_messages;

pub async fn create_message<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    player_id: i64,
    name: &str,
    body: &str,
    is_alive_at_send: bool,
) -> Result<chat_messages::Model, sea_orm::DbErr> {
    let message_active = chat_messages::ActiveModel {
        id: NotSet,
        room_id: Set(room_id),
        player_id: Set(player_id),
        name: Set(name.to_string()),
        body: Set(body.to_string()),
        is_alive_at_send: Set(is_alive_at_send),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };

    message_active.insert(conn).await
}

/// Most recent messages first, capped at `limit`.
pub async fn find_recent_by_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    limit: u64,
) -> Result<Vec<chat_messages::Model>, sea_orm::DbErr> {
    chat_messages::Entity::find()
        .filter(chat_messages::Column::RoomId.eq(room_id))
        .order_by_desc(chat_messages::Column::CreatedAt)
        .order_by_desc(chat_messages::Column::Id)
        .limit(limit)
        .all(conn)
        .await
}
