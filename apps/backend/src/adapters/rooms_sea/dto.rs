//! DTOs for the rooms adapter.

use sea_orm::prelude::Json;
use time::OffsetDateTime;

use crate::entities::rooms::{Faction, RoomStage};

#[derive(Debug, Clone)]
pub struct RoomCreate {
    pub code: String,
    pub host_id: String,
    pub rng_seed: i64,
}

impl RoomCreate {
    pub fn new(code: impl Into<String>, host_id: impl Into<String>, rng_seed: i64) -> Self {
        Self {
            code: code.into(),
            host_id: host_id.into(),
            rng_seed,
        }
    }
}

/// Optimistically-locked room update; `None` fields are left untouched.
/// Nullable columns use a double Option so they can be set to NULL.
#[derive(Debug, Clone, Default)]
pub struct RoomUpdate {
    pub id: i64,
    pub current_lock_version: i32,
    pub stage: Option<RoomStage>,
    pub round: Option<i16>,
    pub roles_assigned: Option<bool>,
    pub host_id: Option<String>,
    pub winner: Option<Option<Faction>>,
    pub stage_deadline: Option<Option<OffsetDateTime>>,
    pub last_outcome: Option<Option<Json>>,
    pub ended_at: Option<Option<OffsetDateTime>>,
}

impl RoomUpdate {
    pub fn new(id: i64, current_lock_version: i32) -> Self {
        Self {
            id,
            current_lock_version,
            ..Default::default()
        }
    }

    pub fn with_stage(mut self, stage: RoomStage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn with_round(mut self, round: i16) -> Self {
        self.round = Some(round);
        self
    }

    pub fn with_roles_assigned(mut self, assigned: bool) -> Self {
        self.roles_assigned = Some(assigned);
        self
    }

    pub fn with_host_id(mut self, host_id: impl Into<String>) -> Self {
        self.host_id = Some(host_id.into());
        self
    }

    pub fn with_winner(mut self, winner: Option<Faction>) -> Self {
        self.winner = Some(winner);
        self
    }

    pub fn with_stage_deadline(mut self, deadline: Option<OffsetDateTime>) -> Self {
        self.stage_deadline = Some(deadline);
        self
    }

    pub fn with_last_outcome(mut self, outcome: Option<Json>) -> Self {
        self.last_outcome = Some(outcome);
        self
    }

    pub fn with_ended_at(mut self, ended_at: Option<OffsetDateTime>) -> Self {
        self.ended_at = Some(ended_at);
        self
    }
}
