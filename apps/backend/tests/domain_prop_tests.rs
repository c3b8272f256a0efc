// Property tests for the pure domain: vote tallies, night interplay, role
// multisets.

use std::collections::{HashMap, HashSet};

use backend::config::game::role_counts_for;
use backend::domain::assignment::deal_roles;
use backend::domain::resolution::{resolve_day, resolve_night, RecordedAction};
use backend::entities::room_players::PlayerRole;
use backend::entities::round_actions::ActionKind;
use proptest::prelude::*;

fn vote(actor: i64, target: i64) -> RecordedAction {
    RecordedAction {
        actor_id: actor,
        kind: ActionKind::Vote,
        target_id: target,
    }
}

proptest! {
    /// The day tally eliminates exactly the strict-plurality target, and a
    /// shared top count never eliminates anyone.
    #[test]
    fn day_resolution_is_strict_plurality(targets in proptest::collection::vec(0i64..6, 0..24)) {
        let votes: Vec<RecordedAction> = targets
            .iter()
            .enumerate()
            .map(|(actor, target)| vote(actor as i64 + 100, *target))
            .collect();

        let outcome = resolve_day(&votes);

        let mut tally: HashMap<i64, usize> = HashMap::new();
        for t in &targets {
            *tally.entry(*t).or_insert(0) += 1;
        }
        let top = tally.values().copied().max().unwrap_or(0);
        let leaders: Vec<i64> = tally
            .iter()
            .filter(|(_, c)| **c == top)
            .map(|(id, _)| *id)
            .collect();

        match (leaders.len(), outcome.eliminated) {
            (0, None) => prop_assert!(!outcome.tied),
            (1, Some(id)) => {
                prop_assert_eq!(id, leaders[0]);
                prop_assert!(!outcome.tied);
            }
            (n, None) if n >= 2 => prop_assert!(outcome.tied),
            (_, got) => prop_assert!(false, "unexpected outcome {:?}", got),
        }
    }

    /// A night kills at most one player, and only the kill target.
    #[test]
    fn night_kills_at_most_one(
        kills in proptest::collection::vec((0i64..8, 0i64..8), 0..4),
        save_target in proptest::option::of(0i64..8),
    ) {
        let alive: HashSet<i64> = (0..8).collect();
        let mut ledger: Vec<RecordedAction> = kills
            .iter()
            .map(|(actor, target)| RecordedAction {
                actor_id: *actor,
                kind: ActionKind::Kill,
                target_id: *target,
            })
            .collect();
        if let Some(target) = save_target {
            ledger.push(RecordedAction {
                actor_id: 50,
                kind: ActionKind::Save,
                target_id: target,
            });
        }

        let outcome = resolve_night(&ledger, &alive);

        if let Some(victim) = outcome.killed {
            // The victim is the earliest recorded kill target and wasn't saved
            prop_assert_eq!(Some(victim), kills.first().map(|(_, t)| *t));
            prop_assert_ne!(Some(victim), save_target);
            prop_assert!(outcome.saved_from_death.is_none());
            prop_assert!(!outcome.quiet);
        }
    }

    /// The save negates exactly a matching kill.
    #[test]
    fn matching_save_always_negates(target in 0i64..8) {
        let alive: HashSet<i64> = (0..8).collect();
        let ledger = [
            RecordedAction { actor_id: 40, kind: ActionKind::Kill, target_id: target },
            RecordedAction { actor_id: 41, kind: ActionKind::Save, target_id: target },
        ];

        let outcome = resolve_night(&ledger, &alive);
        prop_assert_eq!(outcome.killed, None);
        prop_assert_eq!(outcome.saved_from_death, Some(target));
        prop_assert!(!outcome.quiet);
    }

    /// Every deal returns exactly the configured multiset, whatever the seed.
    #[test]
    fn deal_matches_the_role_table(player_count in 4usize..=20, seed in any::<u64>()) {
        let roles = deal_roles(player_count, seed).unwrap();
        let counts = role_counts_for(player_count);

        let tally = |role| roles.iter().filter(|r| **r == role).count();
        prop_assert_eq!(roles.len(), player_count);
        prop_assert_eq!(tally(PlayerRole::Wolf), counts.wolves);
        prop_assert_eq!(tally(PlayerRole::Seer), counts.seers);
        prop_assert_eq!(tally(PlayerRole::Doctor), counts.doctors);
    }
}
