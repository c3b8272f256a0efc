//! Presence tracking: heartbeats, stale-player eviction, host failover, and
//! the periodic sweeper that also enforces round deadlines.

use std::sync::Arc;

use sea_orm::DatabaseTransaction;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::adapters::rooms_sea::RoomUpdate;
use crate::config::game::GameConfig;
use crate::db::txn::with_txn;
use crate::entities::rooms::RoomStage;
use crate::error::AppError;
use crate::realtime::broker::RoomEvent;
use crate::repos::rooms::Room;
use crate::repos::{players, rooms};
use crate::services::game_flow::GameFlowService;
use crate::state::app_state::AppState;

#[derive(Clone)]
pub struct PresenceService {
    config: GameConfig,
}

impl PresenceService {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }
}

impl Default for PresenceService {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

/// What one sweep pass did to a room, for post-commit event publishing.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub evicted: Vec<String>,
    pub room_lock_version: Option<i32>,
}

impl PresenceService {
    /// Record a liveness heartbeat for a player.
    pub async fn heartbeat(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
        player_id: &str,
    ) -> Result<(), AppError> {
        let member = players::require_member(txn, room_id, player_id).await?;
        players::update_last_seen(txn, member.id).await?;
        Ok(())
    }

    /// Remove a player, transferring host to the earliest-joined remaining
    /// human when needed, and abandoning the room when no human remains.
    ///
    /// Used by both explicit leave and the staleness sweep; every removal
    /// path shares these rebalancing rules.
    pub async fn remove_from_room(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
        member_id: i64,
        reason: &str,
    ) -> Result<Room, AppError> {
        let room = rooms::require_room(txn, room_id).await?;
        let member = players::require_player(txn, member_id).await?;

        players::delete_player(txn, member.id).await?;
        info!(room_id, player = %member.player_id, reason, "Player removed from room");

        // find_all_by_room returns join order; the first human is the
        // earliest-joined.
        let remaining = players::find_all_by_room(txn, room_id).await?;
        let next_human = remaining.iter().find(|p| p.is_human);

        let updated = match next_human {
            None => {
                if room.stage == RoomStage::Ended {
                    rooms::touch_room(txn, room_id, room.lock_version).await?
                } else {
                    // No humans left: the room is abandoned, not won.
                    let update = RoomUpdate::new(room_id, room.lock_version)
                        .with_stage(RoomStage::Ended)
                        .with_stage_deadline(None)
                        .with_ended_at(Some(time::OffsetDateTime::now_utc()));
                    let updated = rooms::update_room(txn, update).await?;
                    info!(room_id, "No humans remain, room abandoned");
                    updated
                }
            }
            Some(successor) if room.host_id == member.player_id => {
                let update = RoomUpdate::new(room_id, room.lock_version)
                    .with_host_id(successor.player_id.clone());
                let updated = rooms::update_room(txn, update).await?;
                info!(room_id, new_host = %successor.player_id, "Host reassigned");
                updated
            }
            Some(_) => rooms::touch_room(txn, room_id, room.lock_version).await?,
        };

        // The departure may have completed the round or changed the win
        // balance; let the orchestrator settle the room.
        if matches!(updated.stage, RoomStage::Night | RoomStage::Day) {
            let flow = GameFlowService::new(self.config.clone());
            flow.process_room_state(txn, room_id).await?;
            return rooms::require_room(txn, room_id).await.map_err(Into::into);
        }

        Ok(updated)
    }

    /// Evict humans whose heartbeat is older than the timeout. Bots carry no
    /// heartbeat and are exempt.
    pub async fn sweep_room(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
    ) -> Result<SweepReport, AppError> {
        let cutoff = time::OffsetDateTime::now_utc() - self.config.heartbeat_timeout();
        let seated = players::find_all_by_room(txn, room_id).await?;

        let stale: Vec<_> = seated
            .iter()
            .filter(|p| p.is_human && p.last_seen < cutoff)
            .collect();

        let mut report = SweepReport::default();
        for player in stale {
            let room = self
                .remove_from_room(txn, room_id, player.id, "heartbeat timeout")
                .await?;
            report.evicted.push(player.player_id.clone());
            report.room_lock_version = Some(room.lock_version);
        }

        Ok(report)
    }
}

/// Spawn the background sweeper: every tick it evicts stale humans from
/// active rooms and force-resolves rooms whose stage deadline elapsed.
///
/// Each room is handled in its own transaction; a failing room is logged and
/// retried on the next tick rather than aborting the pass.
pub fn spawn_sweeper(state: Arc<AppState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(state.config.sweep_interval());
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = sweep_pass(&state).await {
                warn!(error = %e, "Sweep pass failed, retrying next tick");
            }
        }
    })
}

pub async fn sweep_pass(state: &AppState) -> Result<(), AppError> {
    let presence = PresenceService::new(state.config.clone());
    let flow = GameFlowService::new(state.config.clone());

    let active = with_txn(None, state, |txn| {
        Box::pin(async move { rooms::find_active(txn).await.map_err(Into::into) })
    })
    .await?;

    for room in active {
        let room_id = room.id;

        let report = with_txn(None, state, |txn| {
            let presence = presence.clone();
            Box::pin(async move { presence.sweep_room(txn, room_id).await })
        })
        .await;

        match report {
            Ok(report) => {
                for player_id in &report.evicted {
                    state.broker.publish(RoomEvent::PlayerEvicted {
                        room_id,
                        player_id: player_id.clone(),
                    });
                }
                if let Some(lock_version) = report.room_lock_version {
                    state.broker.publish_room_state(room_id, lock_version);
                }
            }
            Err(e) => {
                warn!(room_id, error = %e, "Presence sweep failed for room");
                continue;
            }
        }
    }

    // Second half of the tick: rooms whose round deadline has elapsed.
    let now = time::OffsetDateTime::now_utc();
    let expired = with_txn(None, state, |txn| {
        Box::pin(async move { rooms::find_past_deadline(txn, now).await.map_err(Into::into) })
    })
    .await?;

    for room in expired {
        let room_id = room.id;
        let resolved = with_txn(None, state, |txn| {
            let flow = flow.clone();
            Box::pin(async move { flow.force_resolve_expired(txn, room_id).await })
        })
        .await;

        match resolved {
            Ok(true) => {
                let room = with_txn(None, state, |txn| {
                    Box::pin(
                        async move { rooms::require_room(txn, room_id).await.map_err(Into::into) },
                    )
                })
                .await?;
                debug!(room_id, "Deadline resolution applied");
                state.broker.publish_room_state(room_id, room.lock_version);
            }
            Ok(false) => {}
            Err(e) => {
                warn!(room_id, error = %e, "Deadline resolution failed for room");
            }
        }
    }

    Ok(())
}
