use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "player_role")]
pub enum PlayerRole {
    #[sea_orm(string_value = "WOLF")]
    Wolf,
    #[sea_orm(string_value = "SEER")]
    Seer,
    #[sea_orm(string_value = "DOCTOR")]
    Doctor,
    #[sea_orm(string_value = "VILLAGER")]
    Villager,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "room_players")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "room_id")]
    pub room_id: i64,
    #[sea_orm(column_name = "player_id")]
    pub player_id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub role: Option<PlayerRole>,
    #[sea_orm(column_name = "is_alive")]
    pub is_alive: bool,
    #[sea_orm(column_name = "is_action_done")]
    pub is_action_done: bool,
    #[sea_orm(column_name = "is_saved")]
    pub is_saved: bool,
    #[sea_orm(column_name = "is_human")]
    pub is_human: bool,
    #[sea_orm(column_name = "joined_at")]
    pub joined_at: OffsetDateTime,
    #[sea_orm(column_name = "last_seen")]
    pub last_seen: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rooms::Entity",
        from = "Column::RoomId",
        to = "super::rooms::Column::Id"
    )]
    Room,
}

impl Related<super::rooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
