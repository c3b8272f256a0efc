use std::collections::HashSet;

use sea_orm::DatabaseTransaction;
use tracing::{debug, info};
use uuid::Uuid;

use super::GameFlowService;
use crate::adapters::rooms_sea::RoomUpdate;
use crate::domain::resolution::{
    check_win, resolve_day, resolve_night, OutcomeSummary, PlayerStatus, RecordedAction,
};
use crate::domain::rules::action_kind_for;
use crate::domain::{deal_roles, derive_role_seed};
use crate::entities::room_players;
use crate::entities::rooms::{Faction, RoomStage};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::repos::players::PlayerCreate;
use crate::repos::rooms::Room;
use crate::repos::{actions, players, rooms};

impl GameFlowService {
    /// Start the game: pad with bots, deal roles, enter the first night.
    ///
    /// Only the host may start, only from the waiting stage, and only once
    /// (`roles_assigned` guards re-invocation). All role writes and the stage
    /// transition share the caller's transaction, so a failed write rolls the
    /// whole assignment back.
    pub async fn start_game(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
        caller_player_id: &str,
    ) -> Result<Room, AppError> {
        let room = rooms::require_room(txn, room_id).await?;

        if room.host_id != caller_player_id {
            return Err(DomainError::validation(
                ValidationKind::NotHost,
                "Only the host may start the game",
            )
            .into());
        }
        // Checked before the stage so a restarted room always reads as
        // AlreadyAssigned, whatever stage it reached.
        if room.roles_assigned {
            return Err(DomainError::conflict(
                ConflictKind::RolesAlreadyAssigned,
                "Roles were already dealt for this room",
            )
            .into());
        }
        if room.stage != RoomStage::Waiting {
            return Err(DomainError::validation(
                ValidationKind::InvalidStage,
                format!("Cannot start from {:?}", room.stage),
            )
            .into());
        }

        let mut seated = players::find_all_by_room(txn, room_id).await?;
        if seated.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::InvalidPlayerCount,
                "Room has no players",
            )
            .into());
        }

        // Fill empty seats with bots so the room reaches the minimum.
        let mut bot_no = seated.len();
        while seated.len() < self.config.min_players {
            bot_no += 1;
            let bot = players::create_player(
                txn,
                PlayerCreate {
                    room_id,
                    player_id: format!("bot:{}", Uuid::new_v4()),
                    name: format!("Bot {bot_no}"),
                    avatar: None,
                    is_human: false,
                },
            )
            .await?;
            debug!(room_id, bot_id = bot.id, "Bot seated");
            seated.push(bot);
        }

        let roles = deal_roles(seated.len(), derive_role_seed(room.rng_seed))?;
        for (player, role) in seated.iter().zip(roles.iter()) {
            players::set_role(txn, player.id, *role).await?;
        }

        let deadline = time::OffsetDateTime::now_utc() + self.config.action_deadline();
        let update = RoomUpdate::new(room_id, room.lock_version)
            .with_stage(RoomStage::Night)
            .with_round(1)
            .with_roles_assigned(true)
            .with_stage_deadline(Some(deadline));
        let updated_room = rooms::update_room(txn, update).await?;

        info!(
            room_id,
            players = seated.len(),
            "Game started, roles dealt, entering night 1"
        );
        debug!(room_id, "Transition: Waiting -> Night");

        self.process_room_state(txn, room_id).await?;
        let final_room = rooms::require_room(txn, room_id).await?;
        Ok(final_room)
    }

    /// Advance the stage once the round is fully resolved.
    ///
    /// Fails closed with RoundIncomplete while eligible actors are still
    /// outstanding; otherwise resolves the round (which advances the stage or
    /// ends the game).
    pub async fn advance_stage(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
    ) -> Result<Room, AppError> {
        let room = rooms::require_room(txn, room_id).await?;

        if !matches!(room.stage, RoomStage::Night | RoomStage::Day) {
            return Err(DomainError::validation(
                ValidationKind::InvalidStage,
                format!("No round to advance in {:?}", room.stage),
            )
            .into());
        }

        let seated = players::find_all_by_room(txn, room_id).await?;
        let pending = eligible_pending(&seated, room.stage);
        if !pending.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::RoundIncomplete,
                format!("{} eligible actors still outstanding", pending.len()),
            )
            .into());
        }

        self.resolve_round_internal(txn, &room).await?;
        let updated_room = rooms::require_room(txn, room_id).await?;
        Ok(updated_room)
    }

    /// End the game, recording the winning faction. Idempotent: calls after
    /// the room has ended are no-ops. A `None` winner marks abandonment.
    pub async fn end_game(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
        winner: Option<Faction>,
    ) -> Result<Room, AppError> {
        let room = rooms::require_room(txn, room_id).await?;
        if room.stage == RoomStage::Ended {
            return Ok(room);
        }

        let update = RoomUpdate::new(room_id, room.lock_version)
            .with_stage(RoomStage::Ended)
            .with_winner(winner)
            .with_stage_deadline(None)
            .with_ended_at(Some(time::OffsetDateTime::now_utc()));
        let updated_room = rooms::update_room(txn, update).await?;

        info!(room_id, winner = ?winner, "Game ended");
        Ok(updated_room)
    }

    /// Force-resolve a room whose stage deadline has elapsed.
    ///
    /// Actors who never submitted are treated as having abstained; the
    /// resolution runs over whatever the ledger holds. Returns true if a
    /// resolution was applied.
    pub async fn force_resolve_expired(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
    ) -> Result<bool, AppError> {
        let room = rooms::require_room(txn, room_id).await?;

        if !matches!(room.stage, RoomStage::Night | RoomStage::Day) {
            return Ok(false);
        }
        if !room.deadline_passed(time::OffsetDateTime::now_utc()) {
            return Ok(false);
        }

        info!(room_id, round = room.round, stage = ?room.stage, "Round deadline elapsed, forcing resolution");
        self.resolve_round_internal(txn, &room).await?;
        self.process_room_state(txn, room_id).await?;
        Ok(true)
    }

    /// Resolve the current round: apply the outcome, reset per-round flags,
    /// run the win check, then advance the stage or end the game. All inside
    /// the caller's transaction, guarded by the room's lock_version, so two
    /// racing resolution attempts cannot double-apply.
    pub(super) async fn resolve_round_internal(
        &self,
        txn: &DatabaseTransaction,
        room: &Room,
    ) -> Result<(), AppError> {
        debug!(room_id = room.id, round = room.round, stage = ?room.stage, "Resolving round");

        let seated = players::find_all_by_room(txn, room.id).await?;
        let ledger = actions::find_all_by_room_and_round(txn, room.id, room.round).await?;
        let recorded: Vec<RecordedAction> = ledger
            .iter()
            .map(|a| RecordedAction {
                actor_id: a.actor_id,
                kind: a.action_kind,
                target_id: a.target_id,
            })
            .collect();

        let name_of = |id: i64| {
            seated
                .iter()
                .find(|p| p.id == id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| format!("player {id}"))
        };

        let (outcome, next_stage, next_round) = match room.stage {
            RoomStage::Night => {
                let alive: HashSet<i64> =
                    seated.iter().filter(|p| p.is_alive).map(|p| p.id).collect();
                let night = resolve_night(&recorded, &alive);

                if let Some(victim) = night.killed {
                    players::set_alive(txn, victim, false).await?;
                    info!(room_id = room.id, victim, "Night kill applied");
                }

                let outcome = OutcomeSummary::Night {
                    killed: night.killed.map(name_of),
                    saved_from_death: night.saved_from_death.map(name_of),
                    quiet: night.quiet,
                };
                (outcome, RoomStage::Day, room.round)
            }
            RoomStage::Day => {
                let day = resolve_day(&recorded);

                if let Some(eliminated) = day.eliminated {
                    players::set_alive(txn, eliminated, false).await?;
                    info!(room_id = room.id, eliminated, "Vote elimination applied");
                }

                let outcome = OutcomeSummary::Day {
                    eliminated: day.eliminated.map(name_of),
                    tied: day.tied,
                };
                (outcome, RoomStage::Night, room.round + 1)
            }
            RoomStage::Waiting | RoomStage::Ended => {
                return Err(DomainError::validation(
                    ValidationKind::InvalidStage,
                    format!("Nothing to resolve in {:?}", room.stage),
                )
                .into());
            }
        };

        let outcome_json = serde_json::to_value(&outcome)
            .map_err(|e| AppError::internal(format!("failed to encode outcome: {e}")))?;

        // Liveness just changed; reload before judging the win condition.
        let after = players::find_all_by_room(txn, room.id).await?;
        let statuses: Vec<PlayerStatus> = after
            .iter()
            .map(|p| PlayerStatus {
                id: p.id,
                role: p.role,
                is_alive: p.is_alive,
            })
            .collect();

        players::reset_round_flags(txn, room.id).await?;

        if let Some(winner) = check_win(&statuses) {
            let update = RoomUpdate::new(room.id, room.lock_version)
                .with_stage(RoomStage::Ended)
                .with_winner(Some(winner))
                .with_last_outcome(Some(outcome_json))
                .with_stage_deadline(None)
                .with_ended_at(Some(time::OffsetDateTime::now_utc()));
            rooms::update_room(txn, update).await?;

            info!(room_id = room.id, winner = ?winner, "Win condition met, game over");
            debug!(room_id = room.id, "Transition: {:?} -> Ended", room.stage);
            return Ok(());
        }

        let deadline = time::OffsetDateTime::now_utc() + self.config.action_deadline();
        let update = RoomUpdate::new(room.id, room.lock_version)
            .with_stage(next_stage)
            .with_round(next_round)
            .with_last_outcome(Some(outcome_json))
            .with_stage_deadline(Some(deadline));
        rooms::update_room(txn, update).await?;

        info!(
            room_id = room.id,
            round = next_round,
            "Round resolved, advancing"
        );
        debug!(
            room_id = room.id,
            "Transition: {:?} -> {:?}", room.stage, next_stage
        );
        Ok(())
    }
}

/// Living players whose role owes an action this stage and haven't acted.
pub(super) fn eligible_pending(
    seated: &[room_players::Model],
    stage: RoomStage,
) -> Vec<i64> {
    seated
        .iter()
        .filter(|p| p.is_alive && !p.is_action_done)
        .filter(|p| {
            p.role
                .map(|role| action_kind_for(role, stage).is_some())
                .unwrap_or(false)
        })
        .map(|p| p.id)
        .collect()
}
