//! One-shot role assignment over a joined player list.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::config::game::role_counts_for;
use crate::entities::room_players::PlayerRole;
use crate::errors::domain::{DomainError, ValidationKind};

/// Minimum seats for a playable room (one of each special role + a villager).
pub const MIN_PLAYERS: usize = 4;

/// Derive the role-shuffle seed from the room's stored seed.
///
/// SplitMix64 finalizer, so adjacent room seeds don't produce adjacent
/// shuffles.
pub fn derive_role_seed(room_seed: i64) -> u64 {
    let mut z = (room_seed as u64).wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Deal roles for `player_count` seats deterministically from `seed`.
///
/// Builds the special-role multiset from the scaling table, pads the rest
/// with villagers, and applies a seeded Fisher-Yates permutation. The caller
/// assigns the result positionally over the player list.
pub fn deal_roles(player_count: usize, seed: u64) -> Result<Vec<PlayerRole>, DomainError> {
    if player_count < MIN_PLAYERS {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerCount,
            format!("Need at least {MIN_PLAYERS} players, got {player_count}"),
        ));
    }

    let counts = role_counts_for(player_count);
    if counts.total_special() >= player_count {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerCount,
            "Role table leaves no villager seats",
        ));
    }

    let mut roles = Vec::with_capacity(player_count);
    roles.extend(std::iter::repeat(PlayerRole::Wolf).take(counts.wolves));
    roles.extend(std::iter::repeat(PlayerRole::Seer).take(counts.seers));
    roles.extend(std::iter::repeat(PlayerRole::Doctor).take(counts.doctors));
    roles.extend(std::iter::repeat(PlayerRole::Villager).take(player_count - counts.total_special()));

    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    roles.shuffle(&mut rng);

    Ok(roles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(roles: &[PlayerRole], role: PlayerRole) -> usize {
        roles.iter().filter(|r| **r == role).count()
    }

    #[test]
    fn deal_roles_is_deterministic() {
        let a = deal_roles(6, 12345).unwrap();
        let b = deal_roles(6, 12345).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn deal_roles_different_seeds_differ() {
        // 8 seats gives 8!/(2!·1!·1!·4!) orderings; identical shuffles for
        // these two seeds would be a broken rng
        let a = deal_roles(8, 1).unwrap();
        let b = deal_roles(8, 2).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn deal_roles_matches_scaling_table() {
        let roles = deal_roles(4, 99).unwrap();
        assert_eq!(count(&roles, PlayerRole::Wolf), 1);
        assert_eq!(count(&roles, PlayerRole::Seer), 1);
        assert_eq!(count(&roles, PlayerRole::Doctor), 1);
        assert_eq!(count(&roles, PlayerRole::Villager), 1);

        let roles = deal_roles(10, 99).unwrap();
        assert_eq!(count(&roles, PlayerRole::Wolf), 2);
        assert_eq!(count(&roles, PlayerRole::Villager), 6);
    }

    #[test]
    fn deal_roles_rejects_tiny_rooms() {
        assert!(deal_roles(3, 1).is_err());
        assert!(deal_roles(0, 1).is_err());
    }

    #[test]
    fn derive_role_seed_spreads_adjacent_seeds() {
        assert_ne!(derive_role_seed(1), derive_role_seed(2));
    }
}
