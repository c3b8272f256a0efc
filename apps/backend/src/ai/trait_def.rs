//! Bot player trait definition.

use std::fmt;

use crate::entities::room_players::PlayerRole;
use crate::entities::round_actions::ActionKind;
use crate::error::AppError;

/// Errors that can occur during bot decision-making.
#[derive(Debug)]
pub enum BotError {
    /// The eligible-target list was empty
    NoLegalTarget,
    /// Bot encountered an internal error
    Internal(String),
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotError::NoLegalTarget => write!(f, "bot has no legal target"),
            BotError::Internal(msg) => write!(f, "bot internal error: {msg}"),
        }
    }
}

impl std::error::Error for BotError {}

impl From<BotError> for AppError {
    fn from(err: BotError) -> Self {
        AppError::internal(format!("bot error: {err}"))
    }
}

/// What a bot sees when it has to act: its own seat and role, the action its
/// role owes this stage, and the targets that pass the collector's
/// eligibility rules.
#[derive(Debug, Clone)]
pub struct BotView {
    pub actor_id: i64,
    pub role: PlayerRole,
    pub kind: ActionKind,
    pub candidates: Vec<i64>,
}

/// Trait for bot players.
///
/// Implementations receive a pre-validated view and must choose one of the
/// listed candidates; anything else is rejected downstream by the action
/// collector like any other illegal submission.
pub trait BotPlayer: Send + Sync {
    fn choose_target(&self, view: &BotView) -> Result<i64, BotError>;
}
