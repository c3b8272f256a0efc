//! Bot players that fill empty seats.
//!
//! Bots submit through the same validated action entrypoint as humans; the
//! only bot-specific code is choosing a target.

mod random;
mod trait_def;

pub use random::RandomBot;
pub use trait_def::{BotError, BotPlayer, BotView};

/// The default bot used when seats are padded at game start.
pub fn default_bot() -> Box<dyn BotPlayer> {
    Box::new(RandomBot::new(None))
}
