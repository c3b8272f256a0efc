//! Chat repository functions for the domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::chat_sea as chat_adapter;
use crate::entities::chat_messages;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;

pub type ChatMessage = chat_messages::Model;

pub async fn create_message<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    player_id: i64,
    name: &str,
    body: &str,
    is_alive_at_send: bool,
) -> Result<ChatMessage, DomainError> {
    chat_adapter::create_message(conn, room_id, player_id, name, body, is_alive_at_send)
        .await
        .map_err(map_db_err)
}

pub async fn find_recent_by_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    limit: u64,
) -> Result<Vec<ChatMessage>, DomainError> {
    chat_adapter::find_recent_by_room(conn, room_id, limit)
        .await
        .map_err(map_db_err)
}
