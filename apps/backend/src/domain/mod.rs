//! Pure game logic: role eligibility, role assignment, round resolution.
//!
//! Nothing in this module touches the database. Services load state, call
//! into here, and persist the results.

pub mod assignment;
pub mod resolution;
pub mod rules;

pub use assignment::{deal_roles, derive_role_seed};
pub use resolution::{
    check_win, resolve_day, resolve_night, DayResolution, NightResolution, OutcomeSummary,
    PlayerStatus, RecordedAction,
};
pub use rules::{action_kind_for, may_target_self};
