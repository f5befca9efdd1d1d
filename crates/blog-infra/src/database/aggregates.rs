//! Aggregate count queries shared by the repositories.
//!
//! Every function issues exactly one grouped query.

use std::collections::HashMap;

use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, JoinType, Order,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, prelude::DateTimeWithTimeZone,
};
use uuid::Uuid;

use blog_core::domain::{Tag, TagStats};

use super::entity::{comment, post_like, post_tag, tag};

#[derive(Debug, FromQueryResult)]
struct TagStatsRow {
    id: Uuid,
    title: String,
    created_at: DateTimeWithTimeZone,
    post_count: i64,
}

impl From<TagStatsRow> for TagStats {
    fn from(row: TagStatsRow) -> Self {
        Self {
            tag: Tag {
                id: row.id,
                title: row.title,
                created_at: row.created_at.into(),
            },
            post_count: row.post_count.max(0) as u64,
        }
    }
}

fn tagged_post_count() -> SimpleExpr {
    Expr::col((post_tag::Entity, post_tag::Column::PostId)).count()
}

/// Tags with their post counts, most popular first, ties by title.
///
/// `only` restricts the result to the given tag ids; `limit` truncates it.
pub(crate) async fn tag_stats<C>(
    db: &C,
    only: Option<&[Uuid]>,
    limit: Option<u64>,
) -> Result<Vec<TagStats>, DbErr>
where
    C: ConnectionTrait,
{
    if only.is_some_and(|ids| ids.is_empty()) {
        return Ok(Vec::new());
    }

    let mut query = tag::Entity::find()
        .select_only()
        .column(tag::Column::Id)
        .column(tag::Column::Title)
        .column(tag::Column::CreatedAt)
        .column_as(tagged_post_count(), "post_count")
        .join(JoinType::LeftJoin, tag::Relation::PostTag.def())
        .group_by(tag::Column::Id)
        .group_by(tag::Column::Title)
        .group_by(tag::Column::CreatedAt)
        .order_by(tagged_post_count(), Order::Desc)
        .order_by_asc(tag::Column::Title);

    if let Some(ids) = only {
        query = query.filter(tag::Column::Id.is_in(ids.iter().copied()));
    }
    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    let rows = query.into_model::<TagStatsRow>().all(db).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Comment count per post. Posts without comments are absent from the map.
pub(crate) async fn comment_counts<C>(db: &C, post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, DbErr>
where
    C: ConnectionTrait,
{
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(Uuid, i64)> = comment::Entity::find()
        .select_only()
        .column(comment::Column::PostId)
        .column_as(Expr::col((comment::Entity, comment::Column::Id)).count(), "comment_count")
        .filter(comment::Column::PostId.is_in(post_ids.iter().copied()))
        .group_by(comment::Column::PostId)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, count)| (id, count.max(0) as u64))
        .collect())
}

/// Like count per post. Posts without likes are absent from the map.
pub(crate) async fn like_counts<C>(db: &C, post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, DbErr>
where
    C: ConnectionTrait,
{
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(Uuid, i64)> = post_like::Entity::find()
        .select_only()
        .column(post_like::Column::PostId)
        .column_as(
            Expr::col((post_like::Entity, post_like::Column::UserId)).count(),
            "like_count",
        )
        .filter(post_like::Column::PostId.is_in(post_ids.iter().copied()))
        .group_by(post_like::Column::PostId)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, count)| (id, count.max(0) as u64))
        .collect())
}
