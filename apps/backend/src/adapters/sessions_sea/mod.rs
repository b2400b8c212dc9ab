//! SeaORM adapter for session storage - generic over ConnectionTrait.

use sea_orm::sea_query::{Expr, Func, JoinType, Order, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};

use crate::domain::Marker;
use crate::entities::{players, sessions};
use crate::infra::db_errors::{optimistic_lock_err, session_not_found_err};
use crate::repos::sessions::WinnerRanking;

pub mod dto;

pub use dto::{SeatAssignment, SessionCreate, SessionUpdate, WinnerAggregate};

fn seat_column(marker: Marker) -> sessions::Column {
    match marker {
        Marker::X => sessions::Column::PlayerXId,
        Marker::O => sessions::Column::PlayerOId,
    }
}

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Option<sessions::Model>, sea_orm::DbErr> {
    sessions::Entity::find_by_id(session_id).one(conn).await
}

pub async fn create_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: SessionCreate,
) -> Result<sessions::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let active = sessions::ActiveModel {
        id: NotSet,
        board: Set(dto.board),
        turn: Set(dto.turn),
        status: Set(dto.status),
        moves: Set(dto.moves),
        version: Set(0),
        move_count: Set(dto.move_count),
        player_x_id: Set(dto.player_x_id),
        player_o_id: Set(dto.player_o_id),
        winner_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    active.insert(conn).await
}

/// Compare-and-swap: write the new state only if the row is still at
/// `expected_version`, bumping the version, then refetch.
///
/// Zero rows affected means either a stale version or a missing row; a
/// second read tells the two apart.
pub async fn update_state<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: SessionUpdate,
) -> Result<sessions::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let winner: SimpleExpr = match dto.winner {
        Some(marker) => Expr::col(seat_column(marker)).into(),
        None => Expr::val(None::<i64>).into(),
    };

    let result = sessions::Entity::update_many()
        .col_expr(sessions::Column::Board, Expr::val(dto.board).into())
        .col_expr(sessions::Column::Turn, Expr::val(dto.turn).into())
        .col_expr(sessions::Column::Status, Expr::val(dto.status).into())
        .col_expr(sessions::Column::Moves, Expr::val(dto.moves).into())
        .col_expr(sessions::Column::MoveCount, Expr::val(dto.move_count).into())
        .col_expr(sessions::Column::WinnerId, winner)
        .col_expr(sessions::Column::UpdatedAt, Expr::val(now).into())
        .col_expr(
            sessions::Column::Version,
            Expr::col(sessions::Column::Version).add(1),
        )
        .filter(sessions::Column::Id.eq(dto.id))
        .filter(sessions::Column::Version.eq(dto.expected_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return match find_by_id(conn, dto.id).await? {
            Some(current) => Err(optimistic_lock_err(dto.expected_version, current.version)),
            None => Err(session_not_found_err(dto.id)),
        };
    }

    find_by_id(conn, dto.id)
        .await?
        .ok_or_else(|| session_not_found_err(dto.id))
}

/// Seat a player on an empty side, as a compare-and-swap on the version.
///
/// Zero rows affected is reported as a stale version: any seat change bumps
/// the version, so a filled seat at `expected_version` cannot be observed.
pub async fn assign_seat<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: SeatAssignment,
) -> Result<sessions::Model, sea_orm::DbErr> {
    let seat = seat_column(dto.marker);

    let result = sessions::Entity::update_many()
        .col_expr(seat, Expr::val(dto.player_id).into())
        .col_expr(
            sessions::Column::UpdatedAt,
            Expr::val(time::OffsetDateTime::now_utc()).into(),
        )
        .col_expr(
            sessions::Column::Version,
            Expr::col(sessions::Column::Version).add(1),
        )
        .filter(sessions::Column::Id.eq(dto.id))
        .filter(sessions::Column::Version.eq(dto.expected_version))
        .filter(seat.is_null())
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return match find_by_id(conn, dto.id).await? {
            Some(current) => Err(optimistic_lock_err(dto.expected_version, current.version)),
            None => Err(session_not_found_err(dto.id)),
        };
    }

    find_by_id(conn, dto.id)
        .await?
        .ok_or_else(|| session_not_found_err(dto.id))
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    offset: u64,
    limit: u64,
) -> Result<Vec<sessions::Model>, sea_orm::DbErr> {
    sessions::Entity::find()
        .order_by_asc(sessions::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(conn)
        .await
}

/// Wins and summed move counts per winner, joined to the winner's username.
///
/// Grouped and ranked in the database; only `limit` rows come back.
pub async fn winner_aggregates<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ranking: WinnerRanking,
    limit: u64,
) -> Result<Vec<WinnerAggregate>, sea_orm::DbErr> {
    let move_count = Expr::col((sessions::Entity, sessions::Column::MoveCount));
    let win_count: SimpleExpr = Expr::col((sessions::Entity, sessions::Column::Id)).count();
    let mean_moves: SimpleExpr = Func::avg(move_count.clone()).into();

    let (rank_by, direction) = match ranking {
        WinnerRanking::MostWins => (win_count.clone(), Order::Desc),
        WinnerRanking::FewestMoves => (mean_moves, Order::Asc),
    };

    sessions::Entity::find()
        .select_only()
        .column_as(sessions::Column::WinnerId, "player_id")
        .column_as(players::Column::Username, "username")
        .column_as(win_count, "win_count")
        .column_as(move_count.sum(), "total_moves")
        .join(JoinType::InnerJoin, sessions::Relation::Winner.def())
        .group_by(sessions::Column::WinnerId)
        .group_by(players::Column::Username)
        .order_by(rank_by, direction)
        .order_by_asc(sessions::Column::WinnerId)
        .limit(limit)
        .into_model::<WinnerAggregate>()
        .all(conn)
        .await
}
