use std::env;
use std::time::Duration;

/// Runtime knobs for room coordination.
///
/// Durations are stored in seconds so they can be overridden from the
/// environment without parsing formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Rooms are padded with bots up to this count at start
    pub min_players: usize,
    /// Hard cap on seats per room
    pub max_players: usize,
    /// A human whose heartbeat is older than this is evicted
    pub heartbeat_timeout_secs: u64,
    /// Tick interval of the presence/deadline sweeper
    pub sweep_interval_secs: u64,
    /// A night or day stage is force-resolved after this long
    pub action_deadline_secs: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_players: 4,
            max_players: 16,
            heartbeat_timeout_secs: 10,
            sweep_interval_secs: 5,
            action_deadline_secs: 120,
        }
    }
}

impl GameConfig {
    /// Build a config from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_players: env_usize("ROOM_MIN_PLAYERS", defaults.min_players),
            max_players: env_usize("ROOM_MAX_PLAYERS", defaults.max_players),
            heartbeat_timeout_secs: env_u64("HEARTBEAT_TIMEOUT_SECS", defaults.heartbeat_timeout_secs),
            sweep_interval_secs: env_u64("SWEEP_INTERVAL_SECS", defaults.sweep_interval_secs),
            action_deadline_secs: env_u64("ACTION_DEADLINE_SECS", defaults.action_deadline_secs),
        }
    }

    pub fn heartbeat_timeout(&self) -> time::Duration {
        time::Duration::seconds(self.heartbeat_timeout_secs as i64)
    }

    pub fn action_deadline(&self) -> time::Duration {
        time::Duration::seconds(self.action_deadline_secs as i64)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Special-role multiset for a given room size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleCounts {
    pub wolves: usize,
    pub seers: usize,
    pub doctors: usize,
}

impl RoleCounts {
    pub fn total_special(&self) -> usize {
        self.wolves + self.seers + self.doctors
    }
}

/// Role scaling table.
///
/// Small rooms get one of each special role; wolves (and later seers and
/// doctors) scale up with the lobby so the factions stay balanced.
pub fn role_counts_for(player_count: usize) -> RoleCounts {
    match player_count {
        0..=7 => RoleCounts {
            wolves: 1,
            seers: 1,
            doctors: 1,
        },
        8..=11 => RoleCounts {
            wolves: 2,
            seers: 1,
            doctors: 1,
        },
        12..=15 => RoleCounts {
            wolves: 3,
            seers: 2,
            doctors: 1,
        },
        _ => RoleCounts {
            wolves: 4,
            seers: 2,
            doctors: 2,
        },
    }
}
