use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Comment entity - user-submitted text attached to exactly one post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub published_at: DateTime<Utc>,
}

impl Comment {
    /// Create a comment published now.
    pub fn new(post_id: Uuid, author_id: Uuid, text: String) -> Result<Self, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::Validation("comment text must not be empty".into()));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            text,
            published_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_text() {
        let result = Comment::new(Uuid::new_v4(), Uuid::new_v4(), " \n".into());
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
