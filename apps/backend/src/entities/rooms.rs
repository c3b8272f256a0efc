use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "room_stage")]
pub enum RoomStage {
    #[sea_orm(string_value = "WAITING")]
    Waiting,
    #[sea_orm(string_value = "NIGHT")]
    Night,
    #[sea_orm(string_value = "DAY")]
    Day,
    #[sea_orm(string_value = "ENDED")]
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "faction")]
pub enum Faction {
    #[sea_orm(string_value = "WOLVES")]
    Wolves,
    #[sea_orm(string_value = "VILLAGERS")]
    Villagers,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub code: String,
    pub stage: RoomStage,
    #[sea_orm(column_type = "SmallInteger")]
    pub round: i16,
    #[sea_orm(column_name = "host_id")]
    pub host_id: String,
    #[sea_orm(column_name = "roles_assigned")]
    pub roles_assigned: bool,
    pub winner: Option<Faction>,
    #[sea_orm(column_name = "rng_seed")]
    pub rng_seed: i64,
    #[sea_orm(column_name = "stage_deadline")]
    pub stage_deadline: Option<OffsetDateTime>,
    #[sea_orm(column_name = "last_outcome")]
    pub last_outcome: Option<Json>,
    #[sea_orm(column_name = "lock_version")]
    pub lock_version: i32,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
    #[sea_orm(column_name = "ended_at")]
    pub ended_at: Option<OffsetDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::room_players::Entity")]
    RoomPlayers,
    #[sea_orm(has_many = "super::round_actions::Entity")]
    RoundActions,
}

impl Related<super::room_players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoomPlayers.def()
    }
}

impl Related<super::round_actions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoundActions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
