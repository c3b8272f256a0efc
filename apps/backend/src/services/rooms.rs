//! Room lifecycle service: create, join-or-rejoin, leave, snapshot.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sea_orm::DatabaseTransaction;
use serde::Serialize;
use tracing::{debug, info};

use crate::adapters::rooms_sea::RoomCreate;
use crate::config::game::GameConfig;
use crate::entities::room_players::PlayerRole;
use crate::entities::rooms::{Faction, RoomStage};
use crate::entities::round_actions::ActionKind;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::extractors::player_identity::PlayerIdentity;
use crate::repos::players::PlayerCreate;
use crate::repos::rooms::Room;
use crate::repos::{actions, players, rooms};
use crate::utils::join_code::generate_join_code;

/// How many code collisions we tolerate before giving up room creation.
const JOIN_CODE_ATTEMPTS: usize = 5;

pub struct RoomService {
    config: GameConfig,
}

impl RoomService {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }
}

impl Default for RoomService {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

/// Public view of one seat. `role` is only populated per the reveal rules in
/// [`RoomService::room_snapshot`].
#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub id: i64,
    pub player_id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub is_alive: bool,
    pub is_action_done: bool,
    pub is_human: bool,
    pub role: Option<PlayerRole>,
}

/// Role of one investigated player, revealed privately to the seer.
#[derive(Debug, Clone, Serialize)]
pub struct SeerReveal {
    pub round: i16,
    pub target_id: i64,
    pub target_name: String,
    pub role: PlayerRole,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomSnapshot {
    pub id: i64,
    pub code: String,
    pub stage: RoomStage,
    pub round: i16,
    pub host_id: String,
    pub roles_assigned: bool,
    pub winner: Option<Faction>,
    pub stage_deadline: Option<time::OffsetDateTime>,
    pub last_outcome: Option<serde_json::Value>,
    pub lock_version: i32,
    pub players: Vec<PlayerView>,
    /// Present only when the viewer is the room's seer.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub seer_reveals: Vec<SeerReveal>,
}

impl RoomService {
    /// Create a room with a fresh join code and seat the host.
    pub async fn create_room(
        &self,
        txn: &DatabaseTransaction,
        identity: &PlayerIdentity,
    ) -> Result<Room, AppError> {
        let mut seed_rng = StdRng::from_os_rng();
        let rng_seed: i64 = seed_rng.random();

        let mut last_err: Option<DomainError> = None;
        for attempt in 0..JOIN_CODE_ATTEMPTS {
            let code = generate_join_code();
            match rooms::create_room(
                txn,
                RoomCreate::new(code.clone(), identity.player_id.clone(), rng_seed),
            )
            .await
            {
                Ok(room) => {
                    players::create_player(
                        txn,
                        PlayerCreate {
                            room_id: room.id,
                            player_id: identity.player_id.clone(),
                            name: identity.name.clone(),
                            avatar: identity.avatar.clone(),
                            is_human: true,
                        },
                    )
                    .await?;

                    info!(room_id = room.id, code = %room.code, host = %identity.player_id, "Room created");
                    return Ok(room);
                }
                Err(DomainError::Conflict(ConflictKind::JoinCodeConflict, detail)) => {
                    debug!(attempt, "Join code collision, regenerating");
                    last_err = Some(DomainError::Conflict(
                        ConflictKind::JoinCodeConflict,
                        detail,
                    ));
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(last_err
            .unwrap_or_else(|| {
                DomainError::conflict(ConflictKind::JoinCodeConflict, "Join code space exhausted")
            })
            .into())
    }

    /// Join a room by code, or rejoin an existing seat.
    ///
    /// Rejoin (same identity + room) is an idempotent upsert at any stage and
    /// refreshes name/avatar/liveness. A brand-new identity can only join
    /// while the room is still waiting and has a free seat.
    pub async fn join_room(
        &self,
        txn: &DatabaseTransaction,
        code: &str,
        identity: &PlayerIdentity,
    ) -> Result<Room, AppError> {
        let room = rooms::find_by_code(txn, code).await?.ok_or_else(|| {
            DomainError::not_found(
                crate::errors::domain::NotFoundKind::Room,
                format!("No room with code {code}"),
            )
        })?;

        if let Some(existing) =
            players::find_by_room_and_player(txn, room.id, &identity.player_id).await?
        {
            players::refresh_identity(
                txn,
                existing.id,
                &identity.name,
                identity.avatar.as_deref(),
            )
            .await?;
            debug!(room_id = room.id, player = %identity.player_id, "Player rejoined");
            let room = rooms::touch_room(txn, room.id, room.lock_version).await?;
            return Ok(room);
        }

        if room.stage != RoomStage::Waiting {
            return Err(DomainError::validation(
                ValidationKind::InvalidStage,
                "Room has already started",
            )
            .into());
        }

        let seated = players::find_all_by_room(txn, room.id).await?;
        if seated.len() >= self.config.max_players {
            return Err(
                DomainError::conflict(ConflictKind::RoomFull, "Room has no free seats").into(),
            );
        }

        players::create_player(
            txn,
            PlayerCreate {
                room_id: room.id,
                player_id: identity.player_id.clone(),
                name: identity.name.clone(),
                avatar: identity.avatar.clone(),
                is_human: true,
            },
        )
        .await?;

        info!(room_id = room.id, player = %identity.player_id, "Player joined");
        let room = rooms::touch_room(txn, room.id, room.lock_version).await?;
        Ok(room)
    }

    /// Leave a room explicitly. Host transfer and abandonment follow the
    /// same rules as a presence eviction.
    pub async fn leave_room(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
        identity: &PlayerIdentity,
    ) -> Result<Room, AppError> {
        let member = players::require_member(txn, room_id, &identity.player_id).await?;
        let presence = crate::services::presence::PresenceService::new(self.config.clone());
        presence
            .remove_from_room(txn, room_id, member.id, "left")
            .await
    }

    /// Assemble the client-facing snapshot.
    ///
    /// Roles stay hidden while the game runs, except the viewer's own role
    /// and everything once the room has ended. Seers additionally get their
    /// accumulated investigation results.
    pub async fn room_snapshot(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
        viewer: Option<&str>,
    ) -> Result<RoomSnapshot, AppError> {
        let room = rooms::require_room(txn, room_id).await?;
        let all_players = players::find_all_by_room(txn, room_id).await?;

        let viewer_seat = viewer.and_then(|player_id| {
            all_players
                .iter()
                .find(|p| p.player_id == player_id)
                .cloned()
        });

        let reveal_all = room.stage == RoomStage::Ended;
        let player_views = all_players
            .iter()
            .map(|p| {
                let own_seat = viewer_seat.as_ref().is_some_and(|v| v.id == p.id);
                PlayerView {
                    id: p.id,
                    player_id: p.player_id.clone(),
                    name: p.name.clone(),
                    avatar: p.avatar.clone(),
                    is_alive: p.is_alive,
                    is_action_done: p.is_action_done,
                    is_human: p.is_human,
                    role: if reveal_all || own_seat { p.role } else { None },
                }
            })
            .collect();

        let seer_reveals = match &viewer_seat {
            Some(seat) if seat.role == Some(PlayerRole::Seer) => {
                let probes =
                    actions::find_by_actor_and_kind(txn, room_id, seat.id, ActionKind::Investigate)
                        .await?;
                probes
                    .into_iter()
                    .filter_map(|probe| {
                        all_players
                            .iter()
                            .find(|p| p.id == probe.target_id)
                            .and_then(|target| {
                                target.role.map(|role| SeerReveal {
                                    round: probe.round,
                                    target_id: target.id,
                                    target_name: target.name.clone(),
                                    role,
                                })
                            })
                    })
                    .collect()
            }
            _ => Vec::new(),
        };

        Ok(RoomSnapshot {
            id: room.id,
            code: room.code,
            stage: room.stage,
            round: room.round,
            host_id: room.host_id,
            roles_assigned: room.roles_assigned,
            winner: room.winner,
            stage_deadline: room.stage_deadline,
            last_outcome: room.last_outcome,
            lock_version: room.lock_version,
            players: player_views,
            seer_reveals,
        })
    }
}
