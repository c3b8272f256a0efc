pub mod player_identity;
pub mod room_id;
