use std::collections::BTreeMap;

use chrono::{Duration, TimeZone, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{DatabaseBackend, DbConn, MockDatabase, Value};
use uuid::Uuid;

use blog_core::domain::{Comment, Post, PostDraft, Tag, User};
use blog_core::error::RepoError;
use blog_core::ports::{
    BaseRepository, CommentRepository, PostRepository, TagRepository, UserRepository,
};

use super::entity::{post, post_like, post_tag, user};
use super::{
    DatabaseConfig, SeaOrmCommentRepository, SeaOrmPostRepository, SeaOrmTagRepository,
    SeaOrmUserRepository, connect,
};

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let now = Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post::Model {
            id: post_id,
            author_id,
            title: "Test Post".to_owned(),
            text: "Content".to_owned(),
            slug: "test-post".to_owned(),
            image: None,
            published_at: now.into(),
        }]])
        .into_connection();

    let repo = SeaOrmPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.expect("post should be found");
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.slug, "test-post");
}

/// Run `freshest` over `count` mocked posts sharing one author and one tag,
/// returning how many statements hit the database.
async fn freshest_statement_count(count: usize) -> usize {
    let now = Utc::now();
    let author = user::Model {
        id: Uuid::new_v4(),
        username: "author".to_owned(),
        is_staff: true,
        created_at: now.into(),
    };
    let tag_id = Uuid::new_v4();

    let posts: Vec<post::Model> = (0..count)
        .map(|i| post::Model {
            id: Uuid::new_v4(),
            author_id: author.id,
            title: format!("Post {i}"),
            text: "Content".to_owned(),
            slug: format!("post-{i}"),
            image: None,
            published_at: (now - Duration::days(i as i64)).into(),
        })
        .collect();
    let links: Vec<post_tag::Model> = posts
        .iter()
        .map(|p| post_tag::Model {
            post_id: p.id,
            tag_id,
        })
        .collect();
    let tag_row = BTreeMap::from([
        ("id", Value::from(tag_id)),
        ("title", Value::from("rust")),
        ("created_at", Value::from(now.fixed_offset())),
        ("post_count", Value::from(count as i64)),
    ]);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([posts])
        .append_query_results([vec![author]])
        .append_query_results([links])
        .append_query_results([vec![tag_row]])
        .append_query_results([Vec::<post_like::Model>::new(), Vec::new()])
        .into_connection();

    let repo = SeaOrmPostRepository::new(db.clone());
    let summaries = repo.freshest(count as u64).await.unwrap();

    assert_eq!(summaries.len(), count);
    assert!(summaries.iter().all(|s| s.author == "author"));
    assert!(summaries.iter().all(|s| s.tags.len() == 1));

    db.into_transaction_log().len()
}

#[tokio::test]
async fn hydration_query_count_is_independent_of_post_count() {
    let single = freshest_statement_count(1).await;
    let many = freshest_statement_count(8).await;

    // posts, authors, tag links, tag stats, comment counts, like counts
    assert_eq!(single, 6);
    assert_eq!(many, single);
}

struct Fixture {
    users: SeaOrmUserRepository,
    posts: SeaOrmPostRepository,
    tags: SeaOrmTagRepository,
    comments: SeaOrmCommentRepository,
}

async fn sqlite() -> DbConn {
    let config = DatabaseConfig {
        sqlx_logging: false,
        ..DatabaseConfig::new("sqlite::memory:")
    };
    let db = connect(&config).await.expect("sqlite connects");
    Migrator::up(&db, None).await.expect("migrations apply");
    db
}

impl Fixture {
    async fn new() -> Self {
        let db = sqlite().await;
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            posts: SeaOrmPostRepository::new(db.clone()),
            tags: SeaOrmTagRepository::new(db.clone()),
            comments: SeaOrmCommentRepository::new(db),
        }
    }

    async fn user(&self, name: &str) -> User {
        let user = User::new(name.into(), true).unwrap();
        self.users.create(user).await.unwrap()
    }

    /// A post published `day` days after a fixed epoch.
    async fn post(&self, author: &User, title: &str, day: i64) -> Post {
        let epoch = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let draft = PostDraft {
            title: title.into(),
            text: format!("{title} body"),
            published_at: Some(epoch + Duration::days(day)),
            ..Default::default()
        };
        let post = Post::new(author.id, draft).unwrap();
        self.posts.create(post).await.unwrap()
    }

    async fn tag(&self, title: &str) -> Tag {
        self.tags.create(Tag::new(title).unwrap()).await.unwrap()
    }

    async fn comment(&self, post: &Post, author: &User, text: &str) -> Comment {
        let comment = Comment::new(post.id, author.id, text.into()).unwrap();
        self.comments.create(comment).await.unwrap()
    }
}

fn titles(summaries: &[blog_core::domain::PostSummary]) -> Vec<&str> {
    summaries.iter().map(|s| s.post.title.as_str()).collect()
}

#[tokio::test]
async fn popular_posts_rank_by_likes_then_recency() {
    let fx = Fixture::new().await;
    let author = fx.user("author").await;
    let readers = [fx.user("r1").await, fx.user("r2").await, fx.user("r3").await];

    fx.post(&author, "Quiet", 1).await;
    let loved = fx.post(&author, "Loved", 2).await;
    let liked_old = fx.post(&author, "Liked old", 3).await;
    let liked_new = fx.post(&author, "Liked new", 4).await;

    for reader in &readers {
        fx.posts.add_like(loved.id, reader.id).await.unwrap();
    }
    fx.posts.add_like(liked_old.id, readers[0].id).await.unwrap();
    fx.posts.add_like(liked_new.id, readers[1].id).await.unwrap();

    let popular = fx.posts.popular(3).await.unwrap();
    assert_eq!(titles(&popular), vec!["Loved", "Liked new", "Liked old"]);
    assert_eq!(popular[0].like_count, 3);
    assert_eq!(popular[1].like_count, 1);
    assert_eq!(popular[0].author, "author");
}

#[tokio::test]
async fn summaries_carry_comment_counts_and_sorted_tags() {
    let fx = Fixture::new().await;
    let author = fx.user("author").await;
    let post = fx.post(&author, "Tagged", 1).await;
    let other = fx.post(&author, "Other", 2).await;

    let zebra = fx.tag("zebra").await;
    let apple = fx.tag("Apple").await;
    fx.posts.set_tags(post.id, &[zebra.id, apple.id]).await.unwrap();
    fx.posts.set_tags(other.id, &[zebra.id]).await.unwrap();

    fx.comment(&post, &author, "first").await;
    fx.comment(&post, &author, "second").await;

    let fresh = fx.posts.freshest(5).await.unwrap();
    let tagged = fresh.iter().find(|s| s.post.id == post.id).unwrap();

    assert_eq!(tagged.comment_count, 2);
    let tag_titles: Vec<_> = tagged.tags.iter().map(|t| t.tag.title.as_str()).collect();
    assert_eq!(tag_titles, vec!["apple", "zebra"]);
    assert_eq!(tagged.tags[1].post_count, 2);
    assert_eq!(tagged.first_tag().map(|t| t.title.as_str()), Some("apple"));

    let untagged = fresh.iter().find(|s| s.post.id == other.id).unwrap();
    assert_eq!(untagged.comment_count, 0);
}

#[tokio::test]
async fn freshest_returns_latest_posts_oldest_first() {
    let fx = Fixture::new().await;
    let author = fx.user("author").await;
    for day in 0..7 {
        fx.post(&author, &format!("Day {day}"), day).await;
    }

    let fresh = fx.posts.freshest(5).await.unwrap();
    assert_eq!(
        titles(&fresh),
        vec!["Day 2", "Day 3", "Day 4", "Day 5", "Day 6"]
    );
}

#[tokio::test]
async fn tagged_posts_are_newest_first_and_limited() {
    let fx = Fixture::new().await;
    let author = fx.user("author").await;
    let rust = fx.tag("rust").await;

    for day in 0..4 {
        let post = fx.post(&author, &format!("Rust {day}"), day).await;
        fx.posts.set_tags(post.id, &[rust.id]).await.unwrap();
    }
    fx.post(&author, "Untagged", 10).await;

    let tagged = fx.posts.tagged(rust.id, 3).await.unwrap();
    assert_eq!(titles(&tagged), vec!["Rust 3", "Rust 2", "Rust 1"]);
}

#[tokio::test]
async fn popular_tags_rank_by_post_count_then_title() {
    let fx = Fixture::new().await;
    let author = fx.user("author").await;
    let a = fx.tag("alpha").await;
    let b = fx.tag("beta").await;
    let c = fx.tag("gamma").await;
    fx.tag("unused").await;

    let p1 = fx.post(&author, "One", 1).await;
    let p2 = fx.post(&author, "Two", 2).await;
    fx.posts.set_tags(p1.id, &[b.id, c.id, a.id]).await.unwrap();
    fx.posts.set_tags(p2.id, &[c.id]).await.unwrap();

    let popular = fx.tags.popular(3).await.unwrap();
    let ranked: Vec<_> = popular
        .iter()
        .map(|t| (t.tag.title.as_str(), t.post_count))
        .collect();
    assert_eq!(ranked, vec![("gamma", 2), ("alpha", 1), ("beta", 1)]);

    let for_post = fx.tags.for_post(p1.id).await.unwrap();
    assert_eq!(for_post[0].tag.title, "gamma");
    assert_eq!(for_post.len(), 3);

    let lookup = fx.tags.find_by_title("gamma").await.unwrap();
    assert_eq!(lookup.map(|t| t.id), Some(c.id));
}

#[tokio::test]
async fn set_tags_replaces_previous_links() {
    let fx = Fixture::new().await;
    let author = fx.user("author").await;
    let post = fx.post(&author, "Post", 1).await;
    let old = fx.tag("old").await;
    let new = fx.tag("new").await;

    fx.posts.set_tags(post.id, &[old.id]).await.unwrap();
    fx.posts.set_tags(post.id, &[new.id, new.id]).await.unwrap();

    let tags = fx.tags.for_post(post.id).await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].tag.id, new.id);

    fx.posts.set_tags(post.id, &[]).await.unwrap();
    assert!(fx.tags.for_post(post.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn likes_are_idempotent() {
    let fx = Fixture::new().await;
    let author = fx.user("author").await;
    let reader = fx.user("reader").await;
    let post = fx.post(&author, "Post", 1).await;

    fx.posts.add_like(post.id, reader.id).await.unwrap();
    fx.posts.add_like(post.id, reader.id).await.unwrap();
    assert_eq!(fx.posts.like_count(post.id).await.unwrap(), 1);

    fx.posts.remove_like(post.id, reader.id).await.unwrap();
    fx.posts.remove_like(post.id, reader.id).await.unwrap();
    assert_eq!(fx.posts.like_count(post.id).await.unwrap(), 0);
}

#[tokio::test]
async fn comments_are_chronological_with_authors() {
    let fx = Fixture::new().await;
    let author = fx.user("author").await;
    let reader = fx.user("reader").await;
    let post = fx.post(&author, "Post", 1).await;

    let mut late = Comment::new(post.id, reader.id, "late".into()).unwrap();
    late.published_at = Utc::now() + Duration::hours(1);
    fx.comments.create(late).await.unwrap();
    fx.comment(&post, &author, "early").await;

    let entries = fx.comments.for_post(post.id).await.unwrap();
    let seen: Vec<_> = entries
        .iter()
        .map(|e| (e.comment.text.as_str(), e.author.as_str()))
        .collect();
    assert_eq!(seen, vec![("early", "author"), ("late", "reader")]);
}

#[tokio::test]
async fn deleting_post_cascades() {
    let fx = Fixture::new().await;
    let author = fx.user("author").await;
    let post = fx.post(&author, "Doomed", 1).await;
    let tag = fx.tag("tag").await;
    fx.posts.set_tags(post.id, &[tag.id]).await.unwrap();
    fx.posts.add_like(post.id, author.id).await.unwrap();
    let comment = fx.comment(&post, &author, "bye").await;

    fx.posts.delete(post.id).await.unwrap();

    assert!(fx.comments.find_by_id(comment.id).await.unwrap().is_none());
    assert_eq!(fx.posts.like_count(post.id).await.unwrap(), 0);
    let stats = fx.tags.popular(5).await.unwrap();
    assert_eq!(stats[0].post_count, 0);
    assert!(matches!(
        fx.posts.delete(post.id).await,
        Err(RepoError::NotFound)
    ));
}

#[tokio::test]
async fn deleting_tag_detaches_it() {
    let fx = Fixture::new().await;
    let author = fx.user("author").await;
    let post = fx.post(&author, "Post", 1).await;
    let tag = fx.tag("gone").await;
    fx.posts.set_tags(post.id, &[tag.id]).await.unwrap();

    fx.tags.delete(tag.id).await.unwrap();

    assert!(fx.tags.for_post(post.id).await.unwrap().is_empty());
    assert!(fx.posts.find_by_id(post.id).await.unwrap().is_some());
}

#[tokio::test]
async fn unique_constraints_surface_as_constraint_errors() {
    let fx = Fixture::new().await;
    let author = fx.user("author").await;
    fx.post(&author, "Same title", 1).await;

    let duplicate = Post::new(
        author.id,
        PostDraft {
            title: "Same title".into(),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(matches!(
        fx.posts.create(duplicate).await,
        Err(RepoError::Constraint(_))
    ));

    fx.tag("rust").await;
    assert!(matches!(
        fx.tags.create(Tag::new("RUST").unwrap()).await,
        Err(RepoError::Constraint(_))
    ));

    assert!(matches!(
        fx.users.create(User::new("author".into(), false).unwrap()).await,
        Err(RepoError::Constraint(_))
    ));
}

#[tokio::test]
async fn update_and_lookup_by_slug() {
    let fx = Fixture::new().await;
    let author = fx.user("author").await;
    let mut post = fx.post(&author, "Draft", 1).await;

    post.apply(PostDraft {
        title: "Final".into(),
        text: "Done".into(),
        slug: Some("final".into()),
        ..Default::default()
    })
    .unwrap();
    fx.posts.update(post.clone()).await.unwrap();

    let found = fx.posts.find_by_slug("final").await.unwrap().unwrap();
    assert_eq!(found.title, "Final");
    assert!(fx.posts.find_by_slug("draft").await.unwrap().is_none());

    let ghost = Post::new(
        author.id,
        PostDraft {
            title: "Ghost".into(),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(matches!(
        fx.posts.update(ghost).await,
        Err(RepoError::NotFound)
    ));

    let by_name = fx.users.find_by_username("author").await.unwrap();
    assert_eq!(by_name.map(|u| u.id), Some(author.id));
}

#[tokio::test]
async fn create_with_tags_is_atomic() {
    let fx = Fixture::new().await;
    let author = fx.user("author").await;
    let tag = fx.tag("kept").await;

    let draft = |title: &str| PostDraft {
        title: title.into(),
        text: "Body".into(),
        ..Default::default()
    };

    let post = Post::new(author.id, draft("Linked")).unwrap();
    let saved = fx.posts.create_with_tags(post, &[tag.id]).await.unwrap();
    let tags = fx.tags.for_post(saved.id).await.unwrap();
    assert_eq!(tags.len(), 1);

    let orphan = Post::new(author.id, draft("Orphan")).unwrap();
    let missing_tag = Uuid::new_v4();
    assert!(matches!(
        fx.posts.create_with_tags(orphan, &[missing_tag]).await,
        Err(RepoError::Constraint(_))
    ));
    assert!(fx.posts.find_by_slug("orphan").await.unwrap().is_none());
}

#[tokio::test]
async fn update_with_tags_keeps_links_when_none_given() {
    let fx = Fixture::new().await;
    let author = fx.user("author").await;
    let mut post = fx.post(&author, "Post", 1).await;
    let tag = fx.tag("stay").await;
    fx.posts.set_tags(post.id, &[tag.id]).await.unwrap();

    post.text = "Edited".into();
    let saved = fx.posts.update_with_tags(post.clone(), None).await.unwrap();
    assert_eq!(saved.text, "Edited");
    assert_eq!(fx.tags.for_post(post.id).await.unwrap().len(), 1);

    fx.posts.update_with_tags(post.clone(), Some(&[])).await.unwrap();
    assert!(fx.tags.for_post(post.id).await.unwrap().is_empty());
}
