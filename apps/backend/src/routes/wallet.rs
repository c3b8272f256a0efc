//! Wallet HTTP routes: the opaque coin-credit contract for external payment
//! processors, plus a balance read for the storefront.

use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::player_identity::PlayerIdentity;
use crate::services::wallet::WalletService;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
struct CreditRequest {
    player_id: String,
    amount: i64,
}

#[derive(Debug, Serialize)]
struct BalanceResponse {
    player_id: String,
    coins: i64,
}

/// POST /api/wallet/credit
async fn credit(
    http_req: HttpRequest,
    body: web::Json<CreditRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let service = WalletService;
    let request = body.into_inner();

    let wallet = with_txn(Some(&http_req), &app_state, |txn| {
        let service = service;
        let request = request;
        Box::pin(async move { service.credit(txn, &request.player_id, request.amount).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(BalanceResponse {
        player_id: wallet.player_id,
        coins: wallet.coins,
    }))
}

/// GET /api/wallet
async fn balance(
    http_req: HttpRequest,
    identity: PlayerIdentity,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let service = WalletService;

    let coins = with_txn(Some(&http_req), &app_state, |txn| {
        let service = service;
        let identity = identity.clone();
        Box::pin(async move { service.balance(txn, &identity.player_id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(BalanceResponse {
        player_id: identity.player_id,
        coins,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/wallet/credit").route(web::post().to(credit)));
    cfg.service(web::resource("/api/wallet").route(web::get().to(balance)));
}
