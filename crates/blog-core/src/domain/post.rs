use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

pub const TITLE_MAX_LEN: usize = 200;
pub const SLUG_MAX_LEN: usize = 200;

/// Post entity - a published blog article.
///
/// The slug is the public lookup key and is unique across posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    pub slug: String,
    /// Image reference relative to the media root.
    pub image: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// Editable fields of a post.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
    /// Derived from the title on creation when absent.
    pub slug: Option<String>,
    pub image: Option<String>,
    /// Defaults to now when absent.
    pub published_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Create a new post authored by `author_id`.
    pub fn new(author_id: Uuid, draft: PostDraft) -> Result<Self, DomainError> {
        let mut post = Self {
            id: Uuid::new_v4(),
            author_id,
            title: String::new(),
            text: String::new(),
            slug: String::new(),
            image: None,
            published_at: Utc::now(),
        };
        post.apply(draft)?;
        if post.slug.is_empty() {
            post.slug = derive_slug(&post.title)?;
        }
        Ok(post)
    }

    /// Replace the editable fields, validating them first.
    /// Without an explicit slug the current one is kept, so the public URL
    /// survives title edits. On error the post is left untouched.
    pub fn apply(&mut self, draft: PostDraft) -> Result<(), DomainError> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::Validation("post title must not be empty".into()));
        }
        if title.chars().count() > TITLE_MAX_LEN {
            return Err(DomainError::Validation(format!(
                "post title must be at most {TITLE_MAX_LEN} characters"
            )));
        }

        let slug = draft.slug.as_deref().map(normalize_slug).transpose()?;

        self.title = title;
        self.text = draft.text;
        if let Some(slug) = slug {
            self.slug = slug;
        }
        self.image = draft.image.filter(|image| !image.trim().is_empty());
        if let Some(published_at) = draft.published_at {
            self.published_at = published_at;
        }
        Ok(())
    }

    /// The first `limit` characters of the body.
    pub fn teaser(&self, limit: usize) -> &str {
        match self.text.char_indices().nth(limit) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }

    /// Public URL of the post detail page.
    pub fn url(&self) -> String {
        format!("/post/{}", self.slug)
    }
}

impl std::fmt::Display for Post {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.title, self.published_at.year())
    }
}

/// Slugify a title, cut to the column limit.
fn derive_slug(title: &str) -> Result<String, DomainError> {
    let mut slug = slug::slugify(title);
    slug.truncate(SLUG_MAX_LEN);
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        return Err(DomainError::Validation(format!(
            "title '{title}' does not produce a usable slug, pass one explicitly"
        )));
    }
    Ok(slug.to_string())
}

fn normalize_slug(slug: &str) -> Result<String, DomainError> {
    let slug = slug.trim().to_lowercase();
    if slug.is_empty() {
        return Err(DomainError::Validation("post slug must not be empty".into()));
    }
    if slug.len() > SLUG_MAX_LEN {
        return Err(DomainError::Validation(format!(
            "post slug must be at most {SLUG_MAX_LEN} characters"
        )));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(DomainError::Validation(format!(
            "post slug '{slug}' may only contain letters, digits, '-' and '_'"
        )));
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn draft(title: &str) -> PostDraft {
        PostDraft {
            title: title.into(),
            text: "Body".into(),
            ..Default::default()
        }
    }

    #[test]
    fn derives_slug_from_title() {
        let post = Post::new(Uuid::new_v4(), draft("Hello, Rust World!")).unwrap();
        assert_eq!(post.slug, "hello-rust-world");
        assert_eq!(post.url(), "/post/hello-rust-world");
    }

    #[test]
    fn keeps_explicit_slug() {
        let post = Post::new(
            Uuid::new_v4(),
            PostDraft {
                slug: Some("My_Slug-2".into()),
                ..draft("Anything")
            },
        )
        .unwrap();
        assert_eq!(post.slug, "my_slug-2");
    }

    #[test]
    fn rejects_invalid_slug() {
        let result = Post::new(
            Uuid::new_v4(),
            PostDraft {
                slug: Some("with space".into()),
                ..draft("Title")
            },
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn rejects_long_title() {
        assert!(Post::new(Uuid::new_v4(), draft(&"a".repeat(TITLE_MAX_LEN + 1))).is_err());
    }

    #[test]
    fn failed_apply_leaves_post_untouched() {
        let mut post = Post::new(Uuid::new_v4(), draft("Original")).unwrap();
        assert!(post.apply(draft("")).is_err());
        assert_eq!(post.title, "Original");
        assert_eq!(post.slug, "original");
    }

    #[test]
    fn title_edit_keeps_existing_slug() {
        let mut post = Post::new(Uuid::new_v4(), draft("Original title")).unwrap();
        post.apply(draft("Fixed typo")).unwrap();
        assert_eq!(post.title, "Fixed typo");
        assert_eq!(post.slug, "original-title");

        post.apply(PostDraft {
            slug: Some("fixed-typo".into()),
            ..draft("Fixed typo")
        })
        .unwrap();
        assert_eq!(post.slug, "fixed-typo");
    }

    #[test]
    fn long_transliterated_title_gets_truncated_slug() {
        let title = "漢".repeat(150);
        let post = Post::new(Uuid::new_v4(), draft(&title)).unwrap();
        assert!(post.slug.len() <= SLUG_MAX_LEN);
        assert!(!post.slug.ends_with('-'));
    }

    #[test]
    fn explicit_slug_length_stays_strict() {
        let result = Post::new(
            Uuid::new_v4(),
            PostDraft {
                slug: Some("a".repeat(SLUG_MAX_LEN + 1)),
                ..draft("Title")
            },
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn title_without_slug_characters_is_rejected() {
        assert!(Post::new(Uuid::new_v4(), draft("!!!")).is_err());
    }

    #[test]
    fn teaser_counts_characters() {
        let mut post = Post::new(Uuid::new_v4(), draft("Title")).unwrap();
        post.text = "привет мир".into();
        assert_eq!(post.teaser(6), "привет");
        assert_eq!(post.teaser(200), "привет мир");
    }

    #[test]
    fn displays_title_and_year() {
        let mut post = Post::new(Uuid::new_v4(), draft("Title")).unwrap();
        post.published_at = Utc.with_ymd_and_hms(2019, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(post.to_string(), "Title, 2019");
    }
}
