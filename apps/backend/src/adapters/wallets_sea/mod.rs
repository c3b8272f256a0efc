//! SeaORM adapter for the wallets table - generic over ConnectionTrait.

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set};

use crate::entities::wallets;

pub async fn find_by_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: &str,
) -> Result<Option<wallets::Model>, sea_orm::DbErr> {
    wallets::Entity::find()
        .filter(wallets::Column::PlayerId.eq(player_id))
        .one(conn)
        .await
}

/// Credit `amount` coins, creating the wallet on first touch.
pub async fn credit<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: &str,
    amount: i64,
) -> Result<wallets::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();

    match find_by_player(conn, player_id).await? {
        Some(existing) => {
            let balance = existing.coins;
            let mut active: wallets::ActiveModel = existing.into();
            active.coins = Set(balance + amount);
            active.updated_at = Set(now);
            active.update(conn).await
        }
        None => {
            let wallet_active = wallets::ActiveModel {
                id: NotSet,
                player_id: Set(player_id.to_string()),
                coins: Set(amount),
                created_at: Set(now),
                updated_at: Set(now),
            };
            wallet_active.insert(conn).await
        }
    }
}
