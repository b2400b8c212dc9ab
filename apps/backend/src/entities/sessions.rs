use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One tic-tac-toe session row.
///
/// `board` is the 9-character row-major encoding, `turn` is "X" or "O",
/// `status` is the SCREAMING_SNAKE status name and `moves` is a JSON array.
/// Text columns keep the schema identical on Postgres and SQLite.
///
/// `move_count` and `winner_id` duplicate what `moves` and the seats already
/// say, so leaderboards can aggregate without decoding move histories.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub board: String,
    pub turn: String,
    pub status: String,
    #[sea_orm(column_type = "Text")]
    pub moves: String,
    pub version: i32,
    pub move_count: i32,
    #[sea_orm(column_name = "player_x_id")]
    pub player_x_id: Option<i64>,
    #[sea_orm(column_name = "player_o_id")]
    pub player_o_id: Option<i64>,
    /// Seated player on the winning side; null for draws and open games.
    #[sea_orm(column_name = "winner_id")]
    pub winner_id: Option<i64>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::players::Entity",
        from = "Column::PlayerXId",
        to = "super::players::Column::Id",
        on_delete = "SetNull"
    )]
    PlayerX,
    #[sea_orm(
        belongs_to = "super::players::Entity",
        from = "Column::PlayerOId",
        to = "super::players::Column::Id",
        on_delete = "SetNull"
    )]
    PlayerO,
    #[sea_orm(
        belongs_to = "super::players::Entity",
        from = "Column::WinnerId",
        to = "super::players::Column::Id",
        on_delete = "SetNull"
    )]
    Winner,
}

impl ActiveModelBehavior for ActiveModel {}
