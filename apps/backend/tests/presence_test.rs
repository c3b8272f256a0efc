// Integration tests for presence: heartbeats, staleness eviction, host
// failover, bot exemption, abandonment.

mod support;

use backend::db::txn::with_txn;
use backend::entities::rooms::RoomStage;
use backend::repos::{players, rooms};
use backend::services::game_flow::GameFlowService;
use backend::services::presence::PresenceService;
use backend::AppError;

use crate::support::{build_test_state, factory};

#[tokio::test]
async fn heartbeat_refreshes_last_seen() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let config = state.config.clone();

    with_txn(None, &state, |txn| {
        let config = config.clone();
        Box::pin(async move {
            let presence = PresenceService::new(config.clone());
            let (room, ids) = factory::setup_room_with_humans(txn, &config, 2).await?;

            let member = factory::member_id(txn, room.id, &ids[1].player_id).await?;
            factory::make_stale(txn, member, 60).await?;
            let before = players::require_player(txn, member).await?.last_seen;

            presence.heartbeat(txn, room.id, &ids[1].player_id).await?;

            let after = players::require_player(txn, member).await?.last_seen;
            assert!(after > before);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn sweep_evicts_players_past_the_heartbeat_timeout() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let config = state.config.clone();

    with_txn(None, &state, |txn| {
        let config = config.clone();
        Box::pin(async move {
            let presence = PresenceService::new(config.clone());
            let (room, ids) = factory::setup_room_with_humans(txn, &config, 3).await?;

            // Timeout is 10s; age one non-host seat by 15s
            assert_eq!(config.heartbeat_timeout_secs, 10);
            let member = factory::member_id(txn, room.id, &ids[2].player_id).await?;
            factory::make_stale(txn, member, 15).await?;

            let report = presence.sweep_room(txn, room.id).await?;
            assert_eq!(report.evicted, vec![ids[2].player_id.clone()]);

            let seated = players::find_all_by_room(txn, room.id).await?;
            assert_eq!(seated.len(), 2);
            assert!(seated.iter().all(|p| p.player_id != ids[2].player_id));

            // Host untouched, room still alive
            let room = rooms::require_room(txn, room.id).await?;
            assert_eq!(room.host_id, ids[0].player_id);
            assert_eq!(room.stage, RoomStage::Waiting);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn evicting_the_host_promotes_the_earliest_joined_human() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let config = state.config.clone();

    with_txn(None, &state, |txn| {
        let config = config.clone();
        Box::pin(async move {
            let presence = PresenceService::new(config.clone());
            let (room, ids) = factory::setup_room_with_humans(txn, &config, 3).await?;

            let host = factory::member_id(txn, room.id, &ids[0].player_id).await?;
            factory::make_stale(txn, host, 15).await?;

            let report = presence.sweep_room(txn, room.id).await?;
            assert_eq!(report.evicted, vec![ids[0].player_id.clone()]);

            // ids[1] joined right after the host: they inherit the room
            let room = rooms::require_room(txn, room.id).await?;
            assert_eq!(room.host_id, ids[1].player_id);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn bots_are_presence_exempt() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let config = state.config.clone();

    with_txn(None, &state, |txn| {
        let config = config.clone();
        Box::pin(async move {
            let presence = PresenceService::new(config.clone());
            let flow = GameFlowService::new(config.clone());
            let (room, ids) = factory::setup_room_with_humans(txn, &config, 1).await?;

            // Start pads the room with bots; bots never heartbeat
            flow.start_game(txn, room.id, &ids[0].player_id).await?;
            let seated = players::find_all_by_room(txn, room.id).await?;
            for bot in seated.iter().filter(|p| !p.is_human) {
                factory::make_stale(txn, bot.id, 3600).await?;
            }
            // Keep the human fresh
            presence.heartbeat(txn, room.id, &ids[0].player_id).await?;

            let report = presence.sweep_room(txn, room.id).await?;
            assert!(report.evicted.is_empty());
            assert_eq!(players::find_all_by_room(txn, room.id).await?.len(), 4);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn room_with_no_humans_left_is_abandoned() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let config = state.config.clone();

    with_txn(None, &state, |txn| {
        let config = config.clone();
        Box::pin(async move {
            let presence = PresenceService::new(config.clone());
            let (room, ids) = factory::setup_room_with_humans(txn, &config, 2).await?;

            for id in &ids {
                let member = factory::member_id(txn, room.id, &id.player_id).await?;
                factory::make_stale(txn, member, 30).await?;
            }

            let report = presence.sweep_room(txn, room.id).await?;
            assert_eq!(report.evicted.len(), 2);

            let room = rooms::require_room(txn, room.id).await?;
            assert_eq!(room.stage, RoomStage::Ended);
            assert_eq!(room.winner, None);
            assert!(room.ended_at.is_some());

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn explicit_leave_uses_the_same_rebalancing() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let config = state.config.clone();

    with_txn(None, &state, |txn| {
        let config = config.clone();
        Box::pin(async move {
            let service = backend::services::rooms::RoomService::new(config.clone());
            let (room, ids) = factory::setup_room_with_humans(txn, &config, 2).await?;

            let updated = service.leave_room(txn, room.id, &ids[0]).await?;
            assert_eq!(updated.host_id, ids[1].player_id);

            let seated = players::find_all_by_room(txn, room.id).await?;
            assert_eq!(seated.len(), 1);

            Ok::<_, AppError>(())
        })
    })
    .await
}
