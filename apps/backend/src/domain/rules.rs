//! Role/stage eligibility rules shared by the action collector and the bots.

use crate::entities::room_players::PlayerRole;
use crate::entities::rooms::RoomStage;
use crate::entities::round_actions::ActionKind;

/// The action a role is expected to perform in a stage, if any.
///
/// Night: wolves kill, seers investigate, doctors save, villagers sleep.
/// Day: every living player votes.
pub fn action_kind_for(role: PlayerRole, stage: RoomStage) -> Option<ActionKind> {
    match stage {
        RoomStage::Night => match role {
            PlayerRole::Wolf => Some(ActionKind::Kill),
            PlayerRole::Seer => Some(ActionKind::Investigate),
            PlayerRole::Doctor => Some(ActionKind::Save),
            PlayerRole::Villager => None,
        },
        RoomStage::Day => Some(ActionKind::Vote),
        RoomStage::Waiting | RoomStage::Ended => None,
    }
}

/// Only the doctor may target themself.
pub fn may_target_self(kind: ActionKind) -> bool {
    matches!(kind, ActionKind::Save)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn villagers_have_no_night_action() {
        assert_eq!(action_kind_for(PlayerRole::Villager, RoomStage::Night), None);
    }

    #[test]
    fn every_role_votes_by_day() {
        for role in [
            PlayerRole::Wolf,
            PlayerRole::Seer,
            PlayerRole::Doctor,
            PlayerRole::Villager,
        ] {
            assert_eq!(action_kind_for(role, RoomStage::Day), Some(ActionKind::Vote));
        }
    }

    #[test]
    fn nobody_acts_in_waiting_or_ended() {
        assert_eq!(action_kind_for(PlayerRole::Wolf, RoomStage::Waiting), None);
        assert_eq!(action_kind_for(PlayerRole::Wolf, RoomStage::Ended), None);
    }

    #[test]
    fn only_save_may_self_target() {
        assert!(may_target_self(ActionKind::Save));
        assert!(!may_target_self(ActionKind::Kill));
        assert!(!may_target_self(ActionKind::Investigate));
        assert!(!may_target_self(ActionKind::Vote));
    }
}
