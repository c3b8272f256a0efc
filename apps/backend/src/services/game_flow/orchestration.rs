use sea_orm::DatabaseTransaction;
use tracing::debug;

use super::round_lifecycle::eligible_pending;
use super::GameFlowService;
use crate::entities::rooms::RoomStage;
use crate::error::AppError;
use crate::repos::{players, rooms};

impl GameFlowService {
    /// Process room state after any action or transition.
    ///
    /// The core orchestrator:
    /// 1. Resolves the round if every eligible actor is done
    /// 2. Executes one pending bot action
    /// 3. Loops until neither applies (waiting on a human, or game over)
    ///
    /// Loop-based to avoid recursion between bot actions and resolutions.
    ///
    /// # Safety
    ///
    /// MAX_ITERATIONS caps a full bot-only game: at most 16 seats submit per
    /// stage plus one resolution per stage, and every round kills at most two
    /// players, so even a 16-seat game stays well under 600 iterations.
    pub async fn process_room_state(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
    ) -> Result<(), AppError> {
        const MAX_ITERATIONS: usize = 1000;

        for _iteration in 0..MAX_ITERATIONS {
            let room = rooms::require_room(txn, room_id).await?;

            if room.stage == RoomStage::Ended || room.stage == RoomStage::Waiting {
                return Ok(());
            }

            // Priority 1: resolve the round once everyone eligible is done
            let seated = players::find_all_by_room(txn, room_id).await?;
            if eligible_pending(&seated, room.stage).is_empty() {
                debug!(room_id, round = room.round, "All eligible actors done, resolving");
                self.resolve_round_internal(txn, &room).await?;
                continue;
            }

            // Priority 2: let one bot act
            let bot_acted = self.check_and_execute_bot_action(txn, &room, &seated).await?;
            if bot_acted {
                continue;
            }

            // Waiting on a human - we're done
            return Ok(());
        }

        Err(AppError::internal(
            "process_room_state exceeded maximum iterations",
        ))
    }
}
