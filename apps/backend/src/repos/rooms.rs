//! Room repository functions for the domain layer.

use sea_orm::prelude::Json;
use sea_orm::ConnectionTrait;

use crate::adapters::rooms_sea as rooms_adapter;
use crate::entities::rooms;
use crate::entities::rooms::{Faction, RoomStage};
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;

/// Room domain model.
///
/// Converted from the database model when loaded through repos functions.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: i64,
    pub code: String,
    pub stage: RoomStage,
    pub round: i16,
    pub host_id: String,
    pub roles_assigned: bool,
    pub winner: Option<Faction>,
    pub rng_seed: i64,
    pub stage_deadline: Option<time::OffsetDateTime>,
    pub last_outcome: Option<Json>,
    pub lock_version: i32,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
    pub ended_at: Option<time::OffsetDateTime>,
}

impl Room {
    pub fn is_ended(&self) -> bool {
        self.stage == RoomStage::Ended
    }

    pub fn deadline_passed(&self, now: time::OffsetDateTime) -> bool {
        self.stage_deadline.is_some_and(|deadline| deadline < now)
    }
}

impl From<rooms::Model> for Room {
    fn from(m: rooms::Model) -> Self {
        Self {
            id: m.id,
            code: m.code,
            stage: m.stage,
            round: m.round,
            host_id: m.host_id,
            roles_assigned: m.roles_assigned,
            winner: m.winner,
            rng_seed: m.rng_seed,
            stage_deadline: m.stage_deadline,
            last_outcome: m.last_outcome,
            lock_version: m.lock_version,
            created_at: m.created_at,
            updated_at: m.updated_at,
            ended_at: m.ended_at,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Option<Room>, DomainError> {
    let room = rooms_adapter::find_by_id(conn, room_id)
        .await
        .map_err(map_db_err)?;
    Ok(room.map(Room::from))
}

pub async fn require_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Room, DomainError> {
    let room = rooms_adapter::require_room(conn, room_id)
        .await
        .map_err(map_db_err)?;
    Ok(Room::from(room))
}

pub async fn find_by_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<Option<Room>, DomainError> {
    let room = rooms_adapter::find_by_code(conn, code)
        .await
        .map_err(map_db_err)?;
    Ok(room.map(Room::from))
}

pub async fn create_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: rooms_adapter::RoomCreate,
) -> Result<Room, DomainError> {
    let room = rooms_adapter::create_room(conn, dto)
        .await
        .map_err(map_db_err)?;
    Ok(Room::from(room))
}

pub async fn update_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: rooms_adapter::RoomUpdate,
) -> Result<Room, DomainError> {
    let room = rooms_adapter::update_room(conn, dto)
        .await
        .map_err(map_db_err)?;
    Ok(Room::from(room))
}

pub async fn touch_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    current_lock_version: i32,
) -> Result<Room, DomainError> {
    let room = rooms_adapter::touch_room(conn, room_id, current_lock_version)
        .await
        .map_err(map_db_err)?;
    Ok(Room::from(room))
}

pub async fn find_past_deadline<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    now: time::OffsetDateTime,
) -> Result<Vec<Room>, DomainError> {
    let rooms = rooms_adapter::find_past_deadline(conn, now)
        .await
        .map_err(map_db_err)?;
    Ok(rooms.into_iter().map(Room::from).collect())
}

pub async fn find_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<Room>, DomainError> {
    let rooms = rooms_adapter::find_active(conn).await.map_err(map_db_err)?;
    Ok(rooms.into_iter().map(Room::from).collect())
}
