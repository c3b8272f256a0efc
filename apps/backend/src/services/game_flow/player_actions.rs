use sea_orm::DatabaseTransaction;
use tracing::{debug, info};

use super::GameFlowService;
use crate::domain::rules::{action_kind_for, may_target_self};
use crate::entities::room_players;
use crate::entities::rooms::RoomStage;
use crate::entities::round_actions::ActionKind;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::repos::rooms::Room;
use crate::repos::{actions, players, rooms};

impl GameFlowService {
    /// Submit an action for a player in the current round.
    ///
    /// Public method that records the action and processes room state
    /// (resolution + bot turns).
    ///
    /// `expected_lock_version` validates the room's lock_version when
    /// provided; omitted, the room's current version is used.
    ///
    /// Returns the room with its final lock_version after processing.
    pub async fn submit_action(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
        player_id: &str,
        kind: ActionKind,
        target_id: i64,
        expected_lock_version: Option<i32>,
    ) -> Result<Room, AppError> {
        let actor = players::require_member(txn, room_id, player_id).await?;
        self.submit_action_internal(txn, room_id, &actor, kind, target_id, expected_lock_version)
            .await?;
        self.process_room_state(txn, room_id).await?;
        let final_room = rooms::require_room(txn, room_id).await?;
        Ok(final_room)
    }

    /// Internal action submission - records the action without processing.
    ///
    /// The bot coordinator calls this directly to avoid recursion; handlers
    /// should use submit_action() instead. Validation data is loaded here
    /// rather than accepted from the caller - services are trust boundaries.
    pub(super) async fn submit_action_internal(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
        actor: &room_players::Model,
        kind: ActionKind,
        target_id: i64,
        expected_lock_version: Option<i32>,
    ) -> Result<Room, AppError> {
        debug!(room_id, actor_id = actor.id, action = ?kind, target_id, "Submitting action");

        let room = rooms::require_room(txn, room_id).await?;

        if let Some(expected_version) = expected_lock_version {
            if room.lock_version != expected_version {
                return Err(DomainError::conflict(
                    ConflictKind::OptimisticLock,
                    format!(
                        "Room was modified concurrently (expected version {}, actual version {}). Please refresh and retry.",
                        expected_version, room.lock_version
                    ),
                )
                .into());
            }
        }

        match room.stage {
            RoomStage::Ended => {
                return Err(DomainError::validation(
                    ValidationKind::GameEnded,
                    "Game has ended; no further actions",
                )
                .into());
            }
            RoomStage::Waiting => {
                return Err(DomainError::validation(
                    ValidationKind::WrongStage,
                    "Game has not started",
                )
                .into());
            }
            RoomStage::Night | RoomStage::Day => {}
        }

        // Stage/kind compatibility before role eligibility, so a day vote
        // sent at night reads as WrongStage rather than IneligibleRole.
        let kind_matches_stage = match room.stage {
            RoomStage::Night => {
                matches!(kind, ActionKind::Kill | ActionKind::Save | ActionKind::Investigate)
            }
            RoomStage::Day => kind == ActionKind::Vote,
            _ => false,
        };
        if !kind_matches_stage {
            return Err(DomainError::validation(
                ValidationKind::WrongStage,
                format!("{kind:?} is not playable during {:?}", room.stage),
            )
            .into());
        }

        if !actor.is_alive {
            return Err(DomainError::validation(
                ValidationKind::DeadActor,
                "Dead players cannot act",
            )
            .into());
        }

        let role = actor.role.ok_or_else(|| {
            DomainError::validation(ValidationKind::IneligibleRole, "Player has no role yet")
        })?;

        if action_kind_for(role, room.stage) != Some(kind) {
            return Err(DomainError::validation(
                ValidationKind::IneligibleRole,
                format!("{role:?} cannot {kind:?}"),
            )
            .into());
        }

        let target = players::require_player(txn, target_id).await?;
        if target.room_id != room_id {
            return Err(DomainError::validation(
                ValidationKind::InvalidTarget,
                "Target is not in this room",
            )
            .into());
        }
        if !target.is_alive {
            return Err(DomainError::validation(
                ValidationKind::InvalidTarget,
                "Target is not alive",
            )
            .into());
        }
        if target.id == actor.id && !may_target_self(kind) {
            return Err(DomainError::validation(
                ValidationKind::InvalidTarget,
                "Cannot target yourself",
            )
            .into());
        }

        // Fast duplicate check; the (room, round, actor) unique index is the
        // concurrency backstop and maps to the same error.
        if actor.is_action_done {
            return Err(DomainError::conflict(
                ConflictKind::ActionAlreadySubmitted,
                "Action already submitted for this round",
            )
            .into());
        }

        actions::create_action(txn, room_id, room.round, actor.id, kind, target.id).await?;
        players::set_action_done(txn, actor.id, true).await?;
        if kind == ActionKind::Save {
            players::set_saved(txn, target.id, true).await?;
        }

        info!(
            room_id,
            actor_id = actor.id,
            action = ?kind,
            target_id = target.id,
            round = room.round,
            "Action persisted"
        );

        // Bump lock_version so every submission fans out a fresh snapshot.
        let lock_version_to_use = expected_lock_version.unwrap_or(room.lock_version);
        let updated_room = rooms::touch_room(txn, room_id, lock_version_to_use).await?;

        Ok(updated_room)
    }
}
