use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, CommentEntry, Post, PostSummary, Tag, TagStats, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Dependent rows go with it.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
///
/// Listing queries return fully hydrated [`PostSummary`] values, loaded with
/// a fixed number of queries however many posts are returned.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Posts with the most likes first; ties go to the newer post.
    async fn popular(&self, limit: u64) -> Result<Vec<PostSummary>, RepoError>;

    /// The `limit` most recently published posts, oldest of them first.
    async fn freshest(&self, limit: u64) -> Result<Vec<PostSummary>, RepoError>;

    /// Posts carrying the tag, newest first.
    async fn tagged(&self, tag_id: Uuid, limit: u64) -> Result<Vec<PostSummary>, RepoError>;

    /// Replace the tag set of a post.
    async fn set_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError>;

    /// Insert a post together with its tag links, atomically.
    async fn create_with_tags(&self, post: Post, tag_ids: &[Uuid]) -> Result<Post, RepoError>;

    /// Overwrite a post and, when `tag_ids` is given, replace its tags in
    /// the same transaction.
    async fn update_with_tags(
        &self,
        post: Post,
        tag_ids: Option<&[Uuid]>,
    ) -> Result<Post, RepoError>;

    /// Record a like. Liking twice is a no-op.
    async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> Result<(), RepoError>;

    async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> Result<(), RepoError>;

    async fn like_count(&self, post_id: Uuid) -> Result<u64, RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    /// Lookup by exact (already normalized) title.
    async fn find_by_title(&self, title: &str) -> Result<Option<Tag>, RepoError>;

    /// Tags carried by the most posts first; ties ordered by title.
    async fn popular(&self, limit: u64) -> Result<Vec<TagStats>, RepoError>;

    /// Tags of a single post, most popular first.
    async fn for_post(&self, post_id: Uuid) -> Result<Vec<TagStats>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments of a post in chronological order.
    async fn for_post(&self, post_id: Uuid) -> Result<Vec<CommentEntry>, RepoError>;
}
