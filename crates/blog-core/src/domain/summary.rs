//! Read models - entities joined with their derived aggregates.
//!
//! Counts are computed by the store on every read and never persisted.

use serde::Serialize;

use super::{Comment, Post, Tag};

/// A tag together with the number of posts carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagStats {
    pub tag: Tag,
    pub post_count: u64,
}

/// A post hydrated with everything a listing card needs.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub post: Post,
    pub author: String,
    /// Tags in title order.
    pub tags: Vec<TagStats>,
    pub comment_count: u64,
    pub like_count: u64,
}

impl PostSummary {
    pub fn first_tag(&self) -> Option<&Tag> {
        self.tags.first().map(|stats| &stats.tag)
    }
}

/// A comment with its author's username.
#[derive(Debug, Clone, Serialize)]
pub struct CommentEntry {
    pub comment: Comment,
    pub author: String,
}
