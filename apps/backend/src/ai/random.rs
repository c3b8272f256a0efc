//! Random bot - picks a uniformly random eligible target.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use super::trait_def::{BotError, BotPlayer, BotView};

/// Bot that chooses uniformly at random from the eligible targets.
///
/// Thread-safe via a Mutexed rng since `BotPlayer` takes `&self`; the
/// optional seed keeps tests reproducible.
pub struct RandomBot {
    rng: Mutex<StdRng>,
}

impl RandomBot {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl BotPlayer for RandomBot {
    fn choose_target(&self, view: &BotView) -> Result<i64, BotError> {
        let mut rng = self.rng.lock();
        view.candidates
            .choose(&mut *rng)
            .copied()
            .ok_or(BotError::NoLegalTarget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::room_players::PlayerRole;
    use crate::entities::round_actions::ActionKind;

    fn view(candidates: Vec<i64>) -> BotView {
        BotView {
            actor_id: 1,
            role: PlayerRole::Wolf,
            kind: ActionKind::Kill,
            candidates,
        }
    }

    #[test]
    fn chooses_only_from_candidates() {
        let bot = RandomBot::new(Some(42));
        for _ in 0..50 {
            let target = bot.choose_target(&view(vec![2, 3, 4])).unwrap();
            assert!([2, 3, 4].contains(&target));
        }
    }

    #[test]
    fn seeded_bots_are_reproducible() {
        let a = RandomBot::new(Some(7));
        let b = RandomBot::new(Some(7));
        let picks_a: Vec<i64> = (0..10)
            .map(|_| a.choose_target(&view(vec![2, 3, 4, 5])).unwrap())
            .collect();
        let picks_b: Vec<i64> = (0..10)
            .map(|_| b.choose_target(&view(vec![2, 3, 4, 5])).unwrap())
            .collect();
        assert_eq!(picks_a, picks_b);
    }

    #[test]
    fn empty_candidates_is_an_error() {
        let bot = RandomBot::new(Some(1));
        assert!(matches!(
            bot.choose_target(&view(vec![])),
            Err(BotError::NoLegalTarget)
        ));
    }
}
