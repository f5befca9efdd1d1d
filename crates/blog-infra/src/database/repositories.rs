//! User, tag and comment repositories.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use blog_core::domain::{CommentEntry, TagStats, User};
use blog_core::error::RepoError;
use blog_core::ports::{CommentRepository, TagRepository, UserRepository};

use super::aggregates;
use super::base::{SeaOrmRepository, query_error};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post_tag;
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, Entity as UserEntity};

/// SeaORM user repository.
pub type SeaOrmUserRepository = SeaOrmRepository<UserEntity>;

/// SeaORM tag repository.
pub type SeaOrmTagRepository = SeaOrmRepository<TagEntity>;

/// SeaORM comment repository.
pub type SeaOrmCommentRepository = SeaOrmRepository<CommentEntity>;

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username = %username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl TagRepository for SeaOrmTagRepository {
    async fn find_by_title(&self, title: &str) -> Result<Option<blog_core::domain::Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Title.eq(title))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn popular(&self, limit: u64) -> Result<Vec<TagStats>, RepoError> {
        aggregates::tag_stats(&self.db, None, Some(limit))
            .await
            .map_err(query_error)
    }

    async fn for_post(&self, post_id: Uuid) -> Result<Vec<TagStats>, RepoError> {
        let tag_ids: Vec<Uuid> = post_tag::Entity::find()
            .select_only()
            .column(post_tag::Column::TagId)
            .filter(post_tag::Column::PostId.eq(post_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(query_error)?;

        aggregates::tag_stats(&self.db, Some(&tag_ids), None)
            .await
            .map_err(query_error)
    }
}

#[async_trait]
impl CommentRepository for SeaOrmCommentRepository {
    async fn for_post(&self, post_id: Uuid) -> Result<Vec<CommentEntry>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::PublishedAt)
            .find_also_related(UserEntity)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(rows
            .into_iter()
            .map(|(comment, author)| CommentEntry {
                author: author.map(|u| u.username).unwrap_or_default(),
                comment: comment.into(),
            })
            .collect())
    }
}
