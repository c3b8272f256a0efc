//! Error codes for the backend API.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request Validation
    /// Caller is not the host of the room
    NotHost,
    /// Room state machine rejected the transition
    InvalidStage,
    /// Action kind is not playable in the current stage
    WrongStage,
    /// Actor's role cannot perform this action
    IneligibleRole,
    /// Target is dead, missing, or forbidden
    InvalidTarget,
    /// Actor is not alive
    DeadActor,
    /// Room already ended
    GameEnded,
    /// Round still has outstanding actors
    RoundIncomplete,
    /// Player count outside configured bounds
    InvalidPlayerCount,
    /// Invalid room ID provided
    InvalidRoomId,
    /// Invalid or missing identity headers
    InvalidIdentity,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    /// Room not found
    RoomNotFound,
    /// Player not found
    PlayerNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Actor already submitted an action this round
    ActionAlreadySubmitted,
    /// Roles already dealt for this room
    AlreadyAssigned,
    /// Join code already exists
    JoinCodeConflict,
    /// Room has no free seats
    RoomFull,
    /// Optimistic lock conflict
    OptimisticLock,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Data corruption detected
    DataCorruption,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NotHost => "NOT_HOST",
            ErrorCode::InvalidStage => "INVALID_STAGE",
            ErrorCode::WrongStage => "WRONG_STAGE",
            ErrorCode::IneligibleRole => "INELIGIBLE_ROLE",
            ErrorCode::InvalidTarget => "INVALID_TARGET",
            ErrorCode::DeadActor => "DEAD_ACTOR",
            ErrorCode::GameEnded => "GAME_ENDED",
            ErrorCode::RoundIncomplete => "ROUND_INCOMPLETE",
            ErrorCode::InvalidPlayerCount => "INVALID_PLAYER_COUNT",
            ErrorCode::InvalidRoomId => "INVALID_ROOM_ID",
            ErrorCode::InvalidIdentity => "INVALID_IDENTITY",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::RoomNotFound => "ROOM_NOT_FOUND",
            ErrorCode::PlayerNotFound => "PLAYER_NOT_FOUND",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ActionAlreadySubmitted => "ACTION_ALREADY_SUBMITTED",
            ErrorCode::AlreadyAssigned => "ALREADY_ASSIGNED",
            ErrorCode::JoinCodeConflict => "JOIN_CODE_CONFLICT",
            ErrorCode::RoomFull => "ROOM_FULL",
            ErrorCode::OptimisticLock => "OPTIMISTIC_LOCK",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::DbError => "DB_ERROR",
            ErrorCode::DbUnavailable => "DB_UNAVAILABLE",
            ErrorCode::DbTimeout => "DB_TIMEOUT",
            ErrorCode::DataCorruption => "DATA_CORRUPTION",
            ErrorCode::Internal => "INTERNAL",
            ErrorCode::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
