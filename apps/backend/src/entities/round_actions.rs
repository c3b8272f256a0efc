use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "action_kind")]
pub enum ActionKind {
    #[sea_orm(string_value = "KILL")]
    Kill,
    #[sea_orm(string_value = "SAVE")]
    Save,
    #[sea_orm(string_value = "INVESTIGATE")]
    Investigate,
    #[sea_orm(string_value = "VOTE")]
    Vote,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "round_actions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "room_id")]
    pub room_id: i64,
    #[sea_orm(column_type = "SmallInteger")]
    pub round: i16,
    #[sea_orm(column_name = "actor_id")]
    pub actor_id: i64,
    #[sea_orm(column_name = "action_kind")]
    pub action_kind: ActionKind,
    #[sea_orm(column_name = "target_id")]
    pub target_id: i64,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rooms::Entity",
        from = "Column::RoomId",
        to = "super::rooms::Column::Id"
    )]
    Room,
    #[sea_orm(
        belongs_to = "super::room_players::Entity",
        from = "Column::ActorId",
        to = "super::room_players::Column::Id"
    )]
    Actor,
}

impl Related<super::rooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
