use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// User entity - authors posts and comments, likes posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Only staff users may author posts.
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a generated ID.
    pub fn new(username: String, is_staff: bool) -> Result<Self, DomainError> {
        let username = username.trim().to_string();
        if username.is_empty() {
            return Err(DomainError::Validation("username must not be empty".into()));
        }
        if username.chars().count() > 150 {
            return Err(DomainError::Validation(
                "username must be at most 150 characters".into(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            username,
            is_staff,
            created_at: Utc::now(),
        })
    }
}
