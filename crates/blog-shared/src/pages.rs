//! View records handed to the page templates.
//!
//! Field names are the template contract; rename them only together with
//! the templates.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A tag as shown in tag clouds and post cards.
#[derive(Debug, Clone, Serialize)]
pub struct TagCard {
    pub title: String,
    pub posts_with_tag: u64,
    pub url: String,
}

/// A post as shown in listings.
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub title: String,
    pub teaser_text: String,
    pub author: String,
    pub comments_amount: u64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub url: String,
    pub tags: Vec<TagCard>,
    pub first_tag_title: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentCard {
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub author: String,
}

/// The full post on its detail page.
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub title: String,
    pub text: String,
    pub author: String,
    pub comments: Vec<CommentCard>,
    pub likes_amount: u64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    /// Most popular first.
    pub tags: Vec<TagCard>,
}

/// Context of `index.html`.
#[derive(Debug, Clone, Serialize)]
pub struct IndexContext {
    pub most_popular_posts: Vec<PostCard>,
    pub page_posts: Vec<PostCard>,
    pub popular_tags: Vec<TagCard>,
}

/// Context of `post-details.html`.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetailContext {
    pub post: PostPage,
    pub popular_tags: Vec<TagCard>,
    pub most_popular_posts: Vec<PostCard>,
}

/// Context of `posts-list.html`.
#[derive(Debug, Clone, Serialize)]
pub struct TagFilterContext {
    pub tag: String,
    pub popular_tags: Vec<TagCard>,
    pub posts: Vec<PostCard>,
    pub most_popular_posts: Vec<PostCard>,
}
