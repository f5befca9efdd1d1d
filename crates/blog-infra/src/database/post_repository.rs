//! Post repository: listings, tag links and likes.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbConn, EntityTrait, JoinType, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use blog_core::domain::{Post, PostSummary, TagStats};
use blog_core::error::RepoError;
use blog_core::ports::PostRepository;

use super::aggregates;
use super::base::{SeaOrmRepository, query_error, write_error};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::{post_like, post_tag, user};

/// SeaORM post repository.
pub type SeaOrmPostRepository = SeaOrmRepository<PostEntity>;

/// Load authors, tags, comment and like counts for `posts` in batch,
/// preserving the input order.
async fn hydrate(db: &DbConn, posts: Vec<post::Model>) -> Result<Vec<PostSummary>, RepoError> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
    let author_ids: HashSet<Uuid> = posts.iter().map(|p| p.author_id).collect();

    let authors: HashMap<Uuid, String> = user::Entity::find()
        .filter(user::Column::Id.is_in(author_ids))
        .all(db)
        .await
        .map_err(query_error)?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();

    let links = post_tag::Entity::find()
        .filter(post_tag::Column::PostId.is_in(post_ids.iter().copied()))
        .all(db)
        .await
        .map_err(query_error)?;

    let tag_ids: Vec<Uuid> = links
        .iter()
        .map(|l| l.tag_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let tags: HashMap<Uuid, TagStats> = aggregates::tag_stats(db, Some(&tag_ids), None)
        .await
        .map_err(query_error)?
        .into_iter()
        .map(|stats| (stats.tag.id, stats))
        .collect();

    let mut tags_by_post: HashMap<Uuid, Vec<TagStats>> = HashMap::new();
    for link in links {
        if let Some(stats) = tags.get(&link.tag_id) {
            tags_by_post
                .entry(link.post_id)
                .or_default()
                .push(stats.clone());
        }
    }

    let comments = aggregates::comment_counts(db, &post_ids)
        .await
        .map_err(query_error)?;
    let likes = aggregates::like_counts(db, &post_ids)
        .await
        .map_err(query_error)?;

    tracing::debug!(posts = posts.len(), tags = tag_ids.len(), "Hydrated post summaries");

    Ok(posts
        .into_iter()
        .map(|model| {
            let mut tags = tags_by_post.remove(&model.id).unwrap_or_default();
            tags.sort_by(|a, b| a.tag.title.cmp(&b.tag.title));

            PostSummary {
                author: authors.get(&model.author_id).cloned().unwrap_or_default(),
                comment_count: comments.get(&model.id).copied().unwrap_or(0),
                like_count: likes.get(&model.id).copied().unwrap_or(0),
                tags,
                post: model.into(),
            }
        })
        .collect())
}

/// Swap the tag links of a post inside the caller's transaction.
async fn replace_tags<C>(db: &C, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    post_tag::Entity::delete_many()
        .filter(post_tag::Column::PostId.eq(post_id))
        .exec(db)
        .await
        .map_err(write_error)?;

    let unique: HashSet<Uuid> = tag_ids.iter().copied().collect();
    if unique.is_empty() {
        return Ok(());
    }

    let links = unique.into_iter().map(|tag_id| post_tag::ActiveModel {
        post_id: Set(post_id),
        tag_id: Set(tag_id),
    });
    post_tag::Entity::insert_many(links)
        .exec_without_returning(db)
        .await
        .map_err(write_error)?;

    Ok(())
}

#[async_trait]
impl PostRepository for SeaOrmPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn popular(&self, limit: u64) -> Result<Vec<PostSummary>, RepoError> {
        let like_count = Expr::col((post_like::Entity, post_like::Column::UserId)).count();

        let ranked: Vec<(Uuid, i64)> = PostEntity::find()
            .select_only()
            .column(post::Column::Id)
            .column_as(like_count.clone(), "like_count")
            .join(JoinType::LeftJoin, post::Relation::PostLike.def())
            .group_by(post::Column::Id)
            .group_by(post::Column::PublishedAt)
            .order_by(like_count, Order::Desc)
            .order_by_desc(post::Column::PublishedAt)
            .limit(limit)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(query_error)?;

        let ids: Vec<Uuid> = ranked.iter().map(|(id, _)| *id).collect();
        let mut models: HashMap<Uuid, post::Model> = PostEntity::find()
            .filter(post::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(query_error)?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        let ordered = ids.iter().filter_map(|id| models.remove(id)).collect();
        hydrate(&self.db, ordered).await
    }

    async fn freshest(&self, limit: u64) -> Result<Vec<PostSummary>, RepoError> {
        let mut models = PostEntity::find()
            .order_by_desc(post::Column::PublishedAt)
            .order_by_desc(post::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(query_error)?;
        models.reverse();

        hydrate(&self.db, models).await
    }

    async fn tagged(&self, tag_id: Uuid, limit: u64) -> Result<Vec<PostSummary>, RepoError> {
        let models = PostEntity::find()
            .join(JoinType::InnerJoin, post::Relation::PostTag.def())
            .filter(post_tag::Column::TagId.eq(tag_id))
            .order_by_desc(post::Column::PublishedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        hydrate(&self.db, models).await
    }

    async fn set_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(write_error)?;
        replace_tags(&txn, post_id, tag_ids).await?;
        txn.commit().await.map_err(write_error)?;

        tracing::debug!(post_id = %post_id, tags = tag_ids.len(), "Replaced post tags");
        Ok(())
    }

    async fn create_with_tags(&self, post: Post, tag_ids: &[Uuid]) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(write_error)?;
        let model = post::ActiveModel::from(post)
            .insert(&txn)
            .await
            .map_err(write_error)?;
        replace_tags(&txn, model.id, tag_ids).await?;
        txn.commit().await.map_err(write_error)?;

        Ok(model.into())
    }

    async fn update_with_tags(
        &self,
        post: Post,
        tag_ids: Option<&[Uuid]>,
    ) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(write_error)?;
        let model = post::ActiveModel::from(post)
            .update(&txn)
            .await
            .map_err(write_error)?;
        if let Some(tag_ids) = tag_ids {
            replace_tags(&txn, model.id, tag_ids).await?;
        }
        txn.commit().await.map_err(write_error)?;

        Ok(model.into())
    }

    async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> Result<(), RepoError> {
        let like = post_like::ActiveModel {
            post_id: Set(post_id),
            user_id: Set(user_id),
        };

        post_like::Entity::insert(like)
            .on_conflict(
                OnConflict::columns([post_like::Column::PostId, post_like::Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(write_error)?;

        Ok(())
    }

    async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> Result<(), RepoError> {
        post_like::Entity::delete_many()
            .filter(post_like::Column::PostId.eq(post_id))
            .filter(post_like::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(write_error)?;

        Ok(())
    }

    async fn like_count(&self, post_id: Uuid) -> Result<u64, RepoError> {
        post_like::Entity::find()
            .filter(post_like::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(query_error)
    }
}
