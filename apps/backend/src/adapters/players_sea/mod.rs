//! SeaORM adapter for player repository - generic over ConnectionTrait.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::players;

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub async fn create_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<players::Model, sea_orm::DbErr> {
    let active = players::ActiveModel {
        id: NotSet,
        username: Set(username.to_string()),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };

    active.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find_by_id(player_id).one(conn).await
}

pub async fn find_by_username<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .filter(players::Column::Username.eq(username))
        .one(conn)
        .await
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    offset: u64,
    limit: u64,
) -> Result<Vec<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .order_by_asc(players::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(conn)
        .await
}
