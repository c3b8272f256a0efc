pub mod chat;
pub mod game_flow;
pub mod presence;
pub mod rooms;
pub mod wallet;
