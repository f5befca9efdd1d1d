//! Shaping of domain read models into template records.

use blog_core::domain::{CommentEntry, Post, PostSummary, TagStats};
use blog_shared::pages::{CommentCard, PostCard, PostPage, TagCard};

use crate::config::SiteConfig;

/// Public URL of a stored image reference.
///
/// Absolute URLs and root-relative paths pass through unchanged; anything
/// else is resolved against the media URL.
pub fn image_url(media_url: &str, image: Option<&str>) -> Option<String> {
    let image = image?;
    if image.starts_with("http://") || image.starts_with("https://") || image.starts_with('/') {
        return Some(image.to_string());
    }
    Some(format!(
        "{}/{}",
        media_url.trim_end_matches('/'),
        image.trim_start_matches("./")
    ))
}

pub fn tag_card(stats: &TagStats) -> TagCard {
    TagCard {
        title: stats.tag.title.clone(),
        posts_with_tag: stats.post_count,
        url: stats.tag.url(),
    }
}

pub fn tag_cards(stats: &[TagStats]) -> Vec<TagCard> {
    stats.iter().map(tag_card).collect()
}

pub fn post_card(summary: &PostSummary, site: &SiteConfig) -> PostCard {
    let post = &summary.post;
    PostCard {
        title: post.title.clone(),
        teaser_text: post.teaser(site.teaser_length).to_string(),
        author: summary.author.clone(),
        comments_amount: summary.comment_count,
        image_url: image_url(&site.media_url, post.image.as_deref()),
        published_at: post.published_at,
        slug: post.slug.clone(),
        url: post.url(),
        tags: tag_cards(&summary.tags),
        first_tag_title: summary.first_tag().map(|tag| tag.title.clone()),
    }
}

pub fn post_cards(summaries: &[PostSummary], site: &SiteConfig) -> Vec<PostCard> {
    summaries.iter().map(|s| post_card(s, site)).collect()
}

pub fn comment_card(entry: &CommentEntry) -> CommentCard {
    CommentCard {
        text: entry.comment.text.clone(),
        published_at: entry.comment.published_at,
        author: entry.author.clone(),
    }
}

/// Everything the detail page shows about one post.
pub struct PostDetails<'a> {
    pub post: &'a Post,
    pub author: &'a str,
    pub comments: &'a [CommentEntry],
    pub likes: u64,
    pub tags: &'a [TagStats],
}

pub fn post_page(details: PostDetails<'_>, site: &SiteConfig) -> PostPage {
    let post = details.post;
    PostPage {
        title: post.title.clone(),
        text: post.text.clone(),
        author: details.author.to_string(),
        comments: details.comments.iter().map(comment_card).collect(),
        likes_amount: details.likes,
        image_url: image_url(&site.media_url, post.image.as_deref()),
        published_at: post.published_at,
        slug: post.slug.clone(),
        tags: tag_cards(details.tags),
    }
}

#[cfg(test)]
mod tests {
    use blog_core::domain::{PostDraft, Tag};
    use uuid::Uuid;

    use super::*;

    fn summary(text: &str, tags: Vec<TagStats>) -> PostSummary {
        let mut post = Post::new(
            Uuid::new_v4(),
            PostDraft {
                title: "Title".into(),
                image: Some("covers/a.jpg".into()),
                ..Default::default()
            },
        )
        .unwrap();
        post.text = text.into();
        PostSummary {
            post,
            author: "alice".into(),
            tags,
            comment_count: 3,
            like_count: 7,
        }
    }

    #[test]
    fn resolves_image_urls() {
        assert_eq!(
            image_url("/media/", Some("covers/a.jpg")).as_deref(),
            Some("/media/covers/a.jpg")
        );
        assert_eq!(
            image_url("https://cdn.example/m", Some("a.jpg")).as_deref(),
            Some("https://cdn.example/m/a.jpg")
        );
        assert_eq!(
            image_url("/media/", Some("https://x.example/a.jpg")).as_deref(),
            Some("https://x.example/a.jpg")
        );
        assert_eq!(image_url("/media/", None), None);
    }

    #[test]
    fn post_card_truncates_teaser_and_picks_first_tag() {
        let tag = TagStats {
            tag: Tag::new("news").unwrap(),
            post_count: 4,
        };
        let card = post_card(&summary(&"x".repeat(250), vec![tag]), &SiteConfig::default());

        assert_eq!(card.teaser_text.chars().count(), 200);
        assert_eq!(card.comments_amount, 3);
        assert_eq!(card.author, "alice");
        assert_eq!(card.image_url.as_deref(), Some("/media/covers/a.jpg"));
        assert_eq!(card.first_tag_title.as_deref(), Some("news"));
        assert_eq!(card.tags[0].posts_with_tag, 4);
        assert_eq!(card.tags[0].url, "/tag/news");
        assert_eq!(card.url, "/post/title");
    }

    #[test]
    fn untagged_post_has_no_first_tag() {
        let card = post_card(&summary("short", Vec::new()), &SiteConfig::default());
        assert_eq!(card.first_tag_title, None);
        assert_eq!(card.teaser_text, "short");
    }
}
