use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Players {
    Table,
    Id,
    Username,
    CreatedAt,
}

#[derive(Iden)]
enum Sessions {
    Table,
    Id,
    Board,
    Turn,
    Status,
    Moves,
    Version,
    MoveCount,
    PlayerXId,
    PlayerOId,
    WinnerId,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // players
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Players::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Players::Username).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Players::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_players_username")
                    .table(Players::Table)
                    .col(Players::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // sessions
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Sessions::Board).string_len(9).not_null())
                    .col(ColumnDef::new(Sessions::Turn).string_len(1).not_null())
                    .col(ColumnDef::new(Sessions::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Sessions::Moves).text().not_null())
                    .col(
                        ColumnDef::new(Sessions::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Sessions::MoveCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Sessions::PlayerXId).big_integer().null())
                    .col(ColumnDef::new(Sessions::PlayerOId).big_integer().null())
                    .col(ColumnDef::new(Sessions::WinnerId).big_integer().null())
                    .col(
                        ColumnDef::new(Sessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sessions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_player_x_id")
                            .from(Sessions::Table, Sessions::PlayerXId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_player_o_id")
                            .from(Sessions::Table, Sessions::PlayerOId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_winner_id")
                            .from(Sessions::Table, Sessions::WinnerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // leaderboards group won sessions by winner
        manager
            .create_index(
                Index::create()
                    .name("ix_sessions_winner_id")
                    .table(Sessions::Table)
                    .col(Sessions::WinnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse order + drop index before table
        manager
            .drop_index(
                Index::drop()
                    .name("ix_sessions_winner_id")
                    .table(Sessions::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Sessions::Table).if_exists().to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ux_players_username")
                    .table(Players::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Players::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}
