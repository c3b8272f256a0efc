// Integration tests for chat and the wallet-credit contract.

mod support;

use backend::db::txn::with_txn;
use backend::repos::players;
use backend::services::chat::ChatService;
use backend::services::wallet::WalletService;
use backend::AppError;

use crate::support::{build_test_state, factory};

#[tokio::test]
async fn chat_messages_record_liveness_and_order() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let config = state.config.clone();

    with_txn(None, &state, |txn| {
        let config = config.clone();
        Box::pin(async move {
            let chat = ChatService;
            let (room, ids) = factory::setup_room_with_humans(txn, &config, 2).await?;

            chat.post_message(txn, room.id, &ids[0], "first").await?;

            // A dead player's message carries the liveness flag
            let member = factory::member_id(txn, room.id, &ids[1].player_id).await?;
            players::set_alive(txn, member, false).await?;
            chat.post_message(txn, room.id, &ids[1], "from beyond").await?;

            let history = chat.list_messages(txn, room.id, None).await?;
            assert_eq!(history.len(), 2);
            // Newest first
            assert_eq!(history[0].body, "from beyond");
            assert!(!history[0].is_alive_at_send);
            assert_eq!(history[1].body, "first");
            assert!(history[1].is_alive_at_send);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn empty_chat_messages_are_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let config = state.config.clone();

    with_txn(None, &state, |txn| {
        let config = config.clone();
        Box::pin(async move {
            let chat = ChatService;
            let (room, ids) = factory::setup_room_with_humans(txn, &config, 1).await?;

            assert!(chat.post_message(txn, room.id, &ids[0], "   ").await.is_err());

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn non_members_cannot_chat() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let config = state.config.clone();

    with_txn(None, &state, |txn| {
        let config = config.clone();
        Box::pin(async move {
            let chat = ChatService;
            let (room, _) = factory::setup_room_with_humans(txn, &config, 1).await?;

            let outsider = factory::identity(9);
            let err = chat
                .post_message(txn, room.id, &outsider, "hello")
                .await
                .unwrap_err();
            assert_eq!(err.code(), backend::ErrorCode::PlayerNotFound);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn wallet_credits_accumulate() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let wallet = WalletService;

            assert_eq!(wallet.balance(txn, "user-1").await?, 0);

            wallet.credit(txn, "user-1", 100).await?;
            let after = wallet.credit(txn, "user-1", 50).await?;
            assert_eq!(after.coins, 150);
            assert_eq!(wallet.balance(txn, "user-1").await?, 150);

            // Game state is untouched by wallet mutations; other players too
            assert_eq!(wallet.balance(txn, "user-2").await?, 0);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn non_positive_credits_are_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let wallet = WalletService;
            assert!(wallet.credit(txn, "user-1", 0).await.is_err());
            assert!(wallet.credit(txn, "user-1", -5).await.is_err());
            assert_eq!(wallet.balance(txn, "user-1").await?, 0);

            Ok::<_, AppError>(())
        })
    })
    .await
}
