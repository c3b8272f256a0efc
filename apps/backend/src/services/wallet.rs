//! Player currency. The only contract exposed to external payment
//! processors: credit N coins to player X. Unrelated to game state.

use sea_orm::DatabaseTransaction;
use tracing::info;

use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::wallets;
use crate::repos::wallets::Wallet;

#[derive(Default)]
pub struct WalletService;

impl WalletService {
    pub async fn credit(
        &self,
        txn: &DatabaseTransaction,
        player_id: &str,
        amount: i64,
    ) -> Result<Wallet, AppError> {
        if player_id.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::Other("EMPTY_PLAYER_ID".into()),
                "Player id required",
            )
            .into());
        }
        if amount <= 0 {
            return Err(DomainError::validation(
                ValidationKind::Other("NON_POSITIVE_AMOUNT".into()),
                "Credit amount must be positive",
            )
            .into());
        }

        let wallet = wallets::credit(txn, player_id, amount).await?;
        info!(player_id, amount, balance = wallet.coins, "Coins credited");
        Ok(wallet)
    }

    pub async fn balance(
        &self,
        txn: &DatabaseTransaction,
        player_id: &str,
    ) -> Result<i64, AppError> {
        let wallet = wallets::find_by_player(txn, player_id).await?;
        Ok(wallet.map(|w| w.coins).unwrap_or(0))
    }
}
