//! Room chat: append-only messages stamped with the sender's liveness.

use sea_orm::DatabaseTransaction;
use tracing::debug;

use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::extractors::player_identity::PlayerIdentity;
use crate::repos::chat::ChatMessage;
use crate::repos::{chat, players};

const MAX_BODY_LEN: usize = 500;
const DEFAULT_HISTORY_LIMIT: u64 = 100;

#[derive(Default)]
pub struct ChatService;

impl ChatService {
    /// Append a message. The sender must be seated in the room; their
    /// liveness at send time is recorded so clients can grey out ghosts.
    pub async fn post_message(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
        identity: &PlayerIdentity,
        body: &str,
    ) -> Result<ChatMessage, AppError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(
                DomainError::validation(ValidationKind::Other("EMPTY_BODY".into()), "Empty message")
                    .into(),
            );
        }
        if body.len() > MAX_BODY_LEN {
            return Err(DomainError::validation(
                ValidationKind::Other("BODY_TOO_LONG".into()),
                format!("Message exceeds {MAX_BODY_LEN} characters"),
            )
            .into());
        }

        let member = players::require_member(txn, room_id, &identity.player_id).await?;
        let message =
            chat::create_message(txn, room_id, member.id, &member.name, body, member.is_alive)
                .await?;

        debug!(room_id, message_id = message.id, "Chat message posted");
        Ok(message)
    }

    /// Recent history, newest first.
    pub async fn list_messages(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
        limit: Option<u64>,
    ) -> Result<Vec<ChatMessage>, AppError> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT).min(DEFAULT_HISTORY_LIMIT);
        chat::find_recent_by_room(txn, room_id, limit)
            .await
            .map_err(Into::into)
    }
}
