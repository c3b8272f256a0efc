pub mod chat_messages;
pub mod room_players;
pub mod rooms;
pub mod round_actions;
pub mod wallets;
