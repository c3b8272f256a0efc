use sea_orm::Statement;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::extension::postgres::Type as PgType;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Rooms {
    Table,
    Id,
    Code,
    Stage,
    Round,
    HostId,
    RolesAssigned,
    Winner,
    RngSeed,
    StageDeadline,
    LastOutcome,
    LockVersion,
    CreatedAt,
    UpdatedAt,
    EndedAt,
}

#[derive(Iden)]
enum RoomPlayers {
    Table,
    Id,
    RoomId,
    PlayerId,
    Name,
    Avatar,
    Role,
    IsAlive,
    IsActionDone,
    IsSaved,
    IsHuman,
    JoinedAt,
    LastSeen,
}

#[derive(Iden)]
enum RoundActions {
    Table,
    Id,
    RoomId,
    Round,
    ActorId,
    ActionKind,
    TargetId,
    CreatedAt,
}

#[derive(Iden)]
enum ChatMessages {
    Table,
    Id,
    RoomId,
    PlayerId,
    Name,
    Body,
    IsAliveAtSend,
    CreatedAt,
}

#[derive(Iden)]
enum Wallets {
    Table,
    Id,
    PlayerId,
    Coins,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum RoomStageEnum {
    #[iden = "room_stage"]
    Type,
}

#[derive(Iden)]
enum PlayerRoleEnum {
    #[iden = "player_role"]
    Type,
}

#[derive(Iden)]
enum ActionKindEnum {
    #[iden = "action_kind"]
    Type,
}

#[derive(Iden)]
enum FactionEnum {
    #[iden = "faction"]
    Type,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create Postgres enums (PostgreSQL only)
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => {
                async fn enum_exists(
                    manager: &SchemaManager<'_>,
                    enum_name: &str,
                ) -> Result<bool, DbErr> {
                    let result = manager
                        .get_connection()
                        .query_one(Statement::from_string(
                            sea_orm::DatabaseBackend::Postgres,
                            format!("SELECT 1 FROM pg_type WHERE typname = '{}'", enum_name),
                        ))
                        .await?;
                    Ok(result.is_some())
                }

                if !enum_exists(manager, "room_stage").await? {
                    manager
                        .create_type(
                            PgType::create()
                                .as_enum(RoomStageEnum::Type)
                                .values(["WAITING", "NIGHT", "DAY", "ENDED"])
                                .to_owned(),
                        )
                        .await?;
                }

                if !enum_exists(manager, "player_role").await? {
                    manager
                        .create_type(
                            PgType::create()
                                .as_enum(PlayerRoleEnum::Type)
                                .values(["WOLF", "SEER", "DOCTOR", "VILLAGER"])
                                .to_owned(),
                        )
                        .await?;
                }

                if !enum_exists(manager, "action_kind").await? {
                    manager
                        .create_type(
                            PgType::create()
                                .as_enum(ActionKindEnum::Type)
                                .values(["KILL", "SAVE", "INVESTIGATE", "VOTE"])
                                .to_owned(),
                        )
                        .await?;
                }

                if !enum_exists(manager, "faction").await? {
                    manager
                        .create_type(
                            PgType::create()
                                .as_enum(FactionEnum::Type)
                                .values(["WOLVES", "VILLAGERS"])
                                .to_owned(),
                        )
                        .await?;
                }
            }
            sea_orm::DatabaseBackend::Sqlite => {
                // SQLite doesn't need enum types - they're stored as TEXT
            }
            _ => {
                return Err(DbErr::Custom("Unsupported database backend".into()));
            }
        }

        // rooms
        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rooms::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Rooms::Code).string().not_null())
                    .col(
                        ColumnDef::new(Rooms::Stage)
                            .custom(RoomStageEnum::Type)
                            .not_null()
                            .default("WAITING"),
                    )
                    .col(
                        ColumnDef::new(Rooms::Round)
                            .small_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Rooms::HostId).string().not_null())
                    .col(
                        ColumnDef::new(Rooms::RolesAssigned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Rooms::Winner).custom(FactionEnum::Type).null())
                    .col(ColumnDef::new(Rooms::RngSeed).big_integer().not_null())
                    .col(
                        ColumnDef::new(Rooms::StageDeadline)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Rooms::LastOutcome).json().null())
                    .col(
                        ColumnDef::new(Rooms::LockVersion)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Rooms::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rooms::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rooms::EndedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // join codes must map 1:1 to rooms
        manager
            .create_index(
                Index::create()
                    .name("ux_rooms_code")
                    .table(Rooms::Table)
                    .col(Rooms::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // room_players
        manager
            .create_table(
                Table::create()
                    .table(RoomPlayers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoomPlayers::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(RoomPlayers::RoomId).big_integer().not_null())
                    .col(ColumnDef::new(RoomPlayers::PlayerId).string().not_null())
                    .col(ColumnDef::new(RoomPlayers::Name).string().not_null())
                    .col(ColumnDef::new(RoomPlayers::Avatar).string().null())
                    .col(
                        ColumnDef::new(RoomPlayers::Role)
                            .custom(PlayerRoleEnum::Type)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(RoomPlayers::IsAlive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(RoomPlayers::IsActionDone)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RoomPlayers::IsSaved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(RoomPlayers::IsHuman).boolean().not_null())
                    .col(
                        ColumnDef::new(RoomPlayers::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoomPlayers::LastSeen)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_room_players_room_id")
                            .from(RoomPlayers::Table, RoomPlayers::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // join-or-rejoin is an upsert keyed by identity + room
        manager
            .create_index(
                Index::create()
                    .name("ux_room_players_room_player")
                    .table(RoomPlayers::Table)
                    .col(RoomPlayers::RoomId)
                    .col(RoomPlayers::PlayerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // round_actions
        manager
            .create_table(
                Table::create()
                    .table(RoundActions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoundActions::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(RoundActions::RoomId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoundActions::Round)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoundActions::ActorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoundActions::ActionKind)
                            .custom(ActionKindEnum::Type)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoundActions::TargetId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoundActions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_round_actions_room_id")
                            .from(RoundActions::Table, RoundActions::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_round_actions_actor_id")
                            .from(RoundActions::Table, RoundActions::ActorId)
                            .to(RoomPlayers::Table, RoomPlayers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_round_actions_target_id")
                            .from(RoundActions::Table, RoundActions::TargetId)
                            .to(RoomPlayers::Table, RoomPlayers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // at most one action per actor per round, enforced by the store
        manager
            .create_index(
                Index::create()
                    .name("ux_round_actions_room_round_actor")
                    .table(RoundActions::Table)
                    .col(RoundActions::RoomId)
                    .col(RoundActions::Round)
                    .col(RoundActions::ActorId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // chat_messages
        manager
            .create_table(
                Table::create()
                    .table(ChatMessages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChatMessages::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(ChatMessages::RoomId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChatMessages::PlayerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ChatMessages::Name).string().not_null())
                    .col(ColumnDef::new(ChatMessages::Body).text().not_null())
                    .col(
                        ColumnDef::new(ChatMessages::IsAliveAtSend)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ChatMessages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // player_id is deliberately unconstrained: the log is
                    // append-only and survives the sender's eviction
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chat_messages_room_id")
                            .from(ChatMessages::Table, ChatMessages::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_chat_messages_room_created")
                    .table(ChatMessages::Table)
                    .col(ChatMessages::RoomId)
                    .col(ChatMessages::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // wallets
        manager
            .create_table(
                Table::create()
                    .table(Wallets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Wallets::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Wallets::PlayerId).string().not_null())
                    .col(
                        ColumnDef::new(Wallets::Coins)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Wallets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Wallets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_wallets_player_id")
                    .table(Wallets::Table)
                    .col(Wallets::PlayerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Wallets::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(ChatMessages::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(RoundActions::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(RoomPlayers::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Rooms::Table).if_exists().to_owned())
            .await?;

        if manager.get_database_backend() == sea_orm::DatabaseBackend::Postgres {
            manager
                .drop_type(PgType::drop().if_exists().name(FactionEnum::Type).to_owned())
                .await?;
            manager
                .drop_type(
                    PgType::drop()
                        .if_exists()
                        .name(ActionKindEnum::Type)
                        .to_owned(),
                )
                .await?;
            manager
                .drop_type(
                    PgType::drop()
                        .if_exists()
                        .name(PlayerRoleEnum::Type)
                        .to_owned(),
                )
                .await?;
            manager
                .drop_type(
                    PgType::drop()
                        .if_exists()
                        .name(RoomStageEnum::Type)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}
