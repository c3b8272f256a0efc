pub mod actions;
pub mod chat;
pub mod players;
pub mod rooms;
pub mod wallets;
