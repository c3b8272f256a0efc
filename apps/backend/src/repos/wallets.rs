//! Wallet repository functions for the domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::wallets_sea as wallets_adapter;
use crate::entities::wallets;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;

pub type Wallet = wallets::Model;

pub async fn find_by_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: &str,
) -> Result<Option<Wallet>, DomainError> {
    wallets_adapter::find_by_player(conn, player_id)
        .await
        .map_err(map_db_err)
}

pub async fn credit<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: &str,
    amount: i64,
) -> Result<Wallet, DomainError> {
    wallets_adapter::credit(conn, player_id, amount)
        .await
        .map_err(map_db_err)
}
