pub mod actions_sea;
pub mod chat_sea;
pub mod players_sea;
pub mod rooms_sea;
pub mod wallets_sea;
