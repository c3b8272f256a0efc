// Integration tests for the bot simulator: bots submit through the same
// entrypoint as humans and always unblock the resolution condition.

mod support;

use backend::db::txn::with_txn;
use backend::domain::rules::action_kind_for;
use backend::entities::room_players::PlayerRole;
use backend::entities::rooms::RoomStage;
use backend::entities::round_actions::ActionKind;
use backend::repos::players::PlayerCreate;
use backend::repos::{actions, players, rooms};
use backend::services::game_flow::GameFlowService;
use backend::AppError;
use sea_orm::DatabaseTransaction;

use crate::support::{build_test_state, factory};

/// One human (villager) and three bots (wolf, seer, doctor), already at
/// night 1. Built directly so the roles are deterministic.
async fn setup_bot_room(txn: &DatabaseTransaction) -> Result<i64, AppError> {
    let config = backend::GameConfig::default();
    let (room, ids) = factory::setup_room_with_humans(txn, &config, 1).await?;

    let bot_roles = [PlayerRole::Wolf, PlayerRole::Seer, PlayerRole::Doctor];
    for (i, role) in bot_roles.iter().enumerate() {
        let bot = players::create_player(
            txn,
            PlayerCreate {
                room_id: room.id,
                player_id: format!("bot:test-{i}"),
                name: format!("Bot {}", i + 2),
                avatar: None,
                is_human: false,
            },
        )
        .await?;
        players::set_role(txn, bot.id, *role).await?;
    }
    factory::force_roles(
        txn,
        room.id,
        &[(ids[0].player_id.as_str(), PlayerRole::Villager)],
    )
    .await?;

    let update = backend::adapters::rooms_sea::RoomUpdate::new(room.id, room.lock_version)
        .with_stage(RoomStage::Night)
        .with_round(1)
        .with_roles_assigned(true);
    rooms::update_room(txn, update).await?;

    Ok(room.id)
}

#[tokio::test]
async fn bots_fill_the_night_ledger_and_unblock_resolution() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let flow = GameFlowService::default();
            let room_id = setup_bot_room(txn).await?;

            flow.process_room_state(txn, room_id).await?;

            // All three night roles were bots, so night 1 resolved with a
            // full ledger: one kill, one save, one investigation.
            let ledger = actions::find_all_by_room_and_round(txn, room_id, 1).await?;
            let count = |kind| ledger.iter().filter(|a| a.action_kind == kind).count();
            assert_eq!(count(ActionKind::Kill), 1);
            assert_eq!(count(ActionKind::Save), 1);
            assert_eq!(count(ActionKind::Investigate), 1);

            // The room never waits on a bot: either it's the human's turn to
            // vote, or the game already ran to its end.
            let room = rooms::require_room(txn, room_id).await?;
            let seated = players::find_all_by_room(txn, room_id).await?;
            match room.stage {
                RoomStage::Ended => {}
                RoomStage::Day => {
                    let pending: Vec<_> = seated
                        .iter()
                        .filter(|p| p.is_alive && !p.is_action_done)
                        .filter(|p| {
                            p.role
                                .map(|r| action_kind_for(r, room.stage).is_some())
                                .unwrap_or(false)
                        })
                        .collect();
                    assert!(pending.iter().all(|p| p.is_human));
                    assert!(!pending.is_empty());
                }
                other => panic!("unexpected stage {other:?}"),
            }

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn human_vote_completes_a_bot_backed_day() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let flow = GameFlowService::default();
            let room_id = setup_bot_room(txn).await?;

            flow.process_room_state(txn, room_id).await?;

            let room = rooms::require_room(txn, room_id).await?;
            if room.stage != RoomStage::Day {
                // The wolf happened to kill the human; nothing left to drive.
                return Ok::<_, AppError>(());
            }

            // Bots have voted; the human's vote closes the round.
            let seated = players::find_all_by_room(txn, room_id).await?;
            let human = seated.iter().find(|p| p.is_human).unwrap();
            assert!(human.is_alive);
            let target = seated
                .iter()
                .find(|p| p.is_alive && p.id != human.id)
                .unwrap();

            let after = flow
                .submit_action(
                    txn,
                    room_id,
                    &human.player_id,
                    ActionKind::Vote,
                    target.id,
                    None,
                )
                .await?;

            // The round resolved: next night, or the game is over.
            assert!(
                (after.stage == RoomStage::Night && after.round == 2)
                    || after.stage == RoomStage::Ended
            );

            Ok::<_, AppError>(())
        })
    })
    .await
}
