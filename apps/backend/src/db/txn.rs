use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest};
use sea_orm::{DatabaseTransaction, TransactionTrait};

use crate::db::require_db;
use crate::error::AppError;
use crate::state::app_state::AppState;

/// Boxed future tied to the transaction borrow, returned by `with_txn`
/// closures.
pub type TxnFuture<'a, R> = Pin<Box<dyn Future<Output = Result<R, AppError>> + Send + 'a>>;

/// A shared transaction wrapper that can be injected into request extensions.
///
/// Tests inject one to observe service effects before commit; production
/// requests run without it and own the transaction lifecycle below.
#[derive(Clone)]
pub struct SharedTxn(pub Arc<DatabaseTransaction>);

impl SharedTxn {
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.0
    }

    pub fn from_req(req: &HttpRequest) -> Option<Self> {
        req.extensions().get::<SharedTxn>().cloned()
    }
}

/// Execute a function within a database transaction
///
/// 1) If a SharedTxn is in request extensions → use it (no commit/rollback here)
/// 2) Otherwise → begin txn, run closure, commit on Ok / rollback on Err
pub fn with_txn<'s, R, F>(
    req: Option<&HttpRequest>,
    state: &'s AppState,
    f: F,
) -> impl Future<Output = Result<R, AppError>> + Send + 's
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxnFuture<'a, R> + Send + 's,
    R: Send,
{
    // Extract any SharedTxn out of request extensions *before* the async block
    // so the non-`Send` `&HttpRequest` is never captured by the returned
    // future; that keeps the future `Send` for the background sweeper, which
    // spawns it onto the multi-threaded runtime.
    let shared_txn: Option<SharedTxn> = req.and_then(SharedTxn::from_req);

    async move {
        if let Some(shared) = shared_txn {
            return f(shared.transaction()).await;
        }

        let db = require_db(state)?;
        let txn = db.begin().await?;
        let out = f(&txn).await;

        match out {
            Ok(val) => {
                txn.commit().await?;
                Ok(val)
            }
            Err(err) => {
                // Best-effort rollback; preserve original error
                let _ = txn.rollback().await;
                Err(err)
            }
        }
    }
}
