use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

pub const TAG_TITLE_MAX_LEN: usize = 20;

/// Tag entity - a labeled category attachable to posts.
///
/// Titles are unique and always stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Create a tag, normalizing and validating its title.
    pub fn new(title: &str) -> Result<Self, DomainError> {
        Ok(Self {
            id: Uuid::new_v4(),
            title: Self::normalize_title(title)?,
            created_at: Utc::now(),
        })
    }

    /// Trim and lowercase a tag title, rejecting empty or overlong input.
    pub fn normalize_title(title: &str) -> Result<String, DomainError> {
        let title = title.trim().to_lowercase();
        if title.is_empty() {
            return Err(DomainError::Validation("tag title must not be empty".into()));
        }
        if title.chars().count() > TAG_TITLE_MAX_LEN {
            return Err(DomainError::Validation(format!(
                "tag title must be at most {TAG_TITLE_MAX_LEN} characters"
            )));
        }
        Ok(title)
    }

    /// Public URL of the tag-filtered post list.
    pub fn url(&self) -> String {
        format!("/tag/{}", self.title)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}
