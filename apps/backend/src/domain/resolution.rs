//! Round resolution: night kill/save interplay, day vote tallies, win check.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::entities::room_players::PlayerRole;
use crate::entities::rooms::Faction;
use crate::entities::round_actions::ActionKind;

/// A ledger entry as loaded for the round being resolved, in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedAction {
    pub actor_id: i64,
    pub kind: ActionKind,
    pub target_id: i64,
}

/// Role/liveness view of one player, as needed by the win check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStatus {
    pub id: i64,
    pub role: Option<PlayerRole>,
    pub is_alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightResolution {
    /// Player killed this night, after the save was applied.
    pub killed: Option<i64>,
    /// Kill target who survived because the save matched.
    pub saved_from_death: Option<i64>,
    /// No effective kill attempt was made.
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayResolution {
    pub eliminated: Option<i64>,
    /// The top vote count was shared; nobody is eliminated.
    pub tied: bool,
}

/// Public summary of the most recent resolution, persisted on the room row
/// and fanned out to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutcomeSummary {
    Night {
        killed: Option<String>,
        saved_from_death: Option<String>,
        quiet: bool,
    },
    Day {
        eliminated: Option<String>,
        tied: bool,
    },
}

/// Resolve a night from the round's action ledger.
///
/// With several wolves the earliest recorded kill is the effective one; the
/// ledger is ordered by submission, which keeps the outcome auditable. A save
/// matching the kill target negates the kill. Investigations never touch
/// public state.
pub fn resolve_night(actions: &[RecordedAction], alive: &HashSet<i64>) -> NightResolution {
    let kill_target = actions
        .iter()
        .find(|a| a.kind == ActionKind::Kill && alive.contains(&a.target_id))
        .map(|a| a.target_id);

    let save_target = actions
        .iter()
        .find(|a| a.kind == ActionKind::Save)
        .map(|a| a.target_id);

    match kill_target {
        None => NightResolution {
            killed: None,
            saved_from_death: None,
            quiet: true,
        },
        Some(victim) if save_target == Some(victim) => NightResolution {
            killed: None,
            saved_from_death: Some(victim),
            quiet: false,
        },
        Some(victim) => NightResolution {
            killed: Some(victim),
            saved_from_death: None,
            quiet: false,
        },
    }
}

/// Tally day votes. Strict plurality eliminates; a shared top count never
/// does, and is never broken randomly.
pub fn resolve_day(actions: &[RecordedAction]) -> DayResolution {
    let mut tally: HashMap<i64, usize> = HashMap::new();
    for action in actions.iter().filter(|a| a.kind == ActionKind::Vote) {
        *tally.entry(action.target_id).or_insert(0) += 1;
    }

    let Some(&top) = tally.values().max() else {
        return DayResolution {
            eliminated: None,
            tied: false,
        };
    };

    let mut leaders = tally.iter().filter(|(_, count)| **count == top);
    let first = leaders.next().map(|(id, _)| *id);
    if leaders.next().is_some() {
        DayResolution {
            eliminated: None,
            tied: true,
        }
    } else {
        DayResolution {
            eliminated: first,
            tied: false,
        }
    }
}

/// Win check, run after every resolution.
///
/// No living wolves -> villagers win. Living wolves matching or outnumbering
/// living non-wolves -> wolves win.
pub fn check_win(players: &[PlayerStatus]) -> Option<Faction> {
    let living_wolves = players
        .iter()
        .filter(|p| p.is_alive && p.role == Some(PlayerRole::Wolf))
        .count();
    let living_others = players
        .iter()
        .filter(|p| p.is_alive && p.role != Some(PlayerRole::Wolf))
        .count();

    if living_wolves == 0 {
        Some(Faction::Villagers)
    } else if living_wolves >= living_others {
        Some(Faction::Wolves)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kill(actor: i64, target: i64) -> RecordedAction {
        RecordedAction {
            actor_id: actor,
            kind: ActionKind::Kill,
            target_id: target,
        }
    }

    fn save(actor: i64, target: i64) -> RecordedAction {
        RecordedAction {
            actor_id: actor,
            kind: ActionKind::Save,
            target_id: target,
        }
    }

    fn vote(actor: i64, target: i64) -> RecordedAction {
        RecordedAction {
            actor_id: actor,
            kind: ActionKind::Vote,
            target_id: target,
        }
    }

    fn alive(ids: &[i64]) -> HashSet<i64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn night_kill_lands_when_unsaved() {
        let outcome = resolve_night(&[kill(1, 4), save(3, 2)], &alive(&[1, 2, 3, 4]));
        assert_eq!(outcome.killed, Some(4));
        assert_eq!(outcome.saved_from_death, None);
        assert!(!outcome.quiet);
    }

    #[test]
    fn matching_save_negates_the_kill() {
        let outcome = resolve_night(&[kill(1, 2), save(3, 2)], &alive(&[1, 2, 3, 4]));
        assert_eq!(outcome.killed, None);
        assert_eq!(outcome.saved_from_death, Some(2));
        assert!(!outcome.quiet);
    }

    #[test]
    fn no_kill_action_is_a_quiet_night() {
        let outcome = resolve_night(&[save(3, 2)], &alive(&[1, 2, 3]));
        assert!(outcome.quiet);
        assert_eq!(outcome.killed, None);
    }

    #[test]
    fn kill_on_dead_target_is_quiet() {
        let outcome = resolve_night(&[kill(1, 9)], &alive(&[1, 2, 3]));
        assert!(outcome.quiet);
    }

    #[test]
    fn earliest_kill_wins_with_multiple_wolves() {
        let outcome = resolve_night(&[kill(1, 3), kill(2, 4)], &alive(&[1, 2, 3, 4]));
        assert_eq!(outcome.killed, Some(3));
    }

    #[test]
    fn investigations_do_not_affect_the_outcome() {
        let probe = RecordedAction {
            actor_id: 2,
            kind: ActionKind::Investigate,
            target_id: 1,
        };
        let outcome = resolve_night(&[probe], &alive(&[1, 2, 3]));
        assert!(outcome.quiet);
    }

    #[test]
    fn strict_plurality_eliminates() {
        let outcome = resolve_day(&[vote(1, 9), vote(2, 9), vote(3, 9), vote(4, 2)]);
        assert_eq!(outcome.eliminated, Some(9));
        assert!(!outcome.tied);
    }

    #[test]
    fn tied_top_count_eliminates_nobody() {
        let outcome = resolve_day(&[vote(1, 2), vote(2, 1), vote(3, 2), vote(4, 1)]);
        assert_eq!(outcome.eliminated, None);
        assert!(outcome.tied);
    }

    #[test]
    fn no_votes_resolves_to_nothing() {
        let outcome = resolve_day(&[]);
        assert_eq!(outcome.eliminated, None);
        assert!(!outcome.tied);
    }

    #[test]
    fn villagers_win_when_wolves_are_gone() {
        let players = [
            PlayerStatus {
                id: 1,
                role: Some(PlayerRole::Wolf),
                is_alive: false,
            },
            PlayerStatus {
                id: 2,
                role: Some(PlayerRole::Villager),
                is_alive: true,
            },
        ];
        assert_eq!(check_win(&players), Some(Faction::Villagers));
    }

    #[test]
    fn wolves_win_on_parity() {
        let players = [
            PlayerStatus {
                id: 1,
                role: Some(PlayerRole::Wolf),
                is_alive: true,
            },
            PlayerStatus {
                id: 2,
                role: Some(PlayerRole::Villager),
                is_alive: true,
            },
            PlayerStatus {
                id: 3,
                role: Some(PlayerRole::Seer),
                is_alive: false,
            },
        ];
        assert_eq!(check_win(&players), Some(Faction::Wolves));
    }

    #[test]
    fn lone_wolf_with_no_villagers_wins() {
        let players = [PlayerStatus {
            id: 1,
            role: Some(PlayerRole::Wolf),
            is_alive: true,
        }];
        assert_eq!(check_win(&players), Some(Faction::Wolves));
    }

    #[test]
    fn game_continues_while_villagers_outnumber_wolves() {
        let players = [
            PlayerStatus {
                id: 1,
                role: Some(PlayerRole::Wolf),
                is_alive: true,
            },
            PlayerStatus {
                id: 2,
                role: Some(PlayerRole::Doctor),
                is_alive: true,
            },
            PlayerStatus {
                id: 3,
                role: Some(PlayerRole::Villager),
                is_alive: true,
            },
        ];
        assert_eq!(check_win(&players), None);
    }
}
