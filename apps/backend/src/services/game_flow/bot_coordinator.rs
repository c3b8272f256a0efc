use sea_orm::DatabaseTransaction;
use tracing::{debug, info, warn};

use super::GameFlowService;
use crate::ai::{default_bot, BotView};
use crate::domain::rules::{action_kind_for, may_target_self};
use crate::entities::room_players;
use crate::error::AppError;
use crate::repos::rooms::Room;

impl GameFlowService {
    /// Find one bot with an outstanding eligible action and execute it.
    ///
    /// Bots go through the same submit entrypoint and the same eligibility
    /// rules as humans; the coordinator only narrows the target list and
    /// picks. Returns true if a bot acted.
    pub(super) async fn check_and_execute_bot_action(
        &self,
        txn: &DatabaseTransaction,
        room: &Room,
        seated: &[room_players::Model],
    ) -> Result<bool, AppError> {
        let Some((bot, role, kind)) = seated.iter().find_map(|p| {
            if p.is_human || !p.is_alive || p.is_action_done {
                return None;
            }
            let role = p.role?;
            action_kind_for(role, room.stage).map(|kind| (p, role, kind))
        }) else {
            return Ok(false);
        };

        let candidates: Vec<i64> = seated
            .iter()
            .filter(|p| p.is_alive)
            .filter(|p| p.id != bot.id || may_target_self(kind))
            .map(|p| p.id)
            .collect();

        let view = BotView {
            actor_id: bot.id,
            role,
            kind,
            candidates,
        };

        info!(room_id = room.id, bot_id = bot.id, action = ?kind, "Processing bot turn");

        const MAX_RETRIES_PER_ACTION: usize = 3;
        let chooser = default_bot();
        let mut last_error = None;

        for retry in 0..MAX_RETRIES_PER_ACTION {
            let target_id = chooser.choose_target(&view)?;

            match self
                .submit_action_internal(txn, room.id, bot, kind, target_id, None)
                .await
            {
                Ok(_) => {
                    debug!(
                        room_id = room.id,
                        bot_id = bot.id,
                        target_id,
                        retry,
                        "Bot action executed"
                    );
                    return Ok(true);
                }
                Err(e) => {
                    warn!(
                        room_id = room.id,
                        bot_id = bot.id,
                        retry,
                        error = ?e,
                        "Bot action failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| AppError::internal("bot action failed with no error details")))
    }
}
