//! Server-rendered pages.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use blog_core::domain::Tag;
use blog_shared::pages::{
    IndexContext, PostCard, PostDetailContext, TagCard, TagFilterContext,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views::{self, PostDetails};

fn render<C: Serialize>(state: &AppState, template: &str, context: &C) -> AppResult<HttpResponse> {
    let context = tera::Context::from_serialize(context)?;
    let body = state.templates.render(template, &context)?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

/// Popular tags and posts shown beside every listing.
async fn sidebar(state: &AppState) -> AppResult<(Vec<TagCard>, Vec<PostCard>)> {
    let tags = state.tags.popular(state.site.popular_tags).await?;
    let posts = state.posts.popular(state.site.popular_posts).await?;
    Ok((
        views::tag_cards(&tags),
        views::post_cards(&posts, &state.site),
    ))
}

/// GET /
pub async fn index(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let (popular_tags, most_popular_posts) = sidebar(&state).await?;
    let fresh = state.posts.freshest(state.site.fresh_posts).await?;

    let context = IndexContext {
        most_popular_posts,
        page_posts: views::post_cards(&fresh, &state.site),
        popular_tags,
    };
    render(&state, "index.html", &context)
}

/// GET /post/{slug}
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let post = state
        .posts
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post '{}' not found", slug)))?;

    let author = state
        .users
        .find_by_id(post.author_id)
        .await?
        .map(|user| user.username)
        .unwrap_or_default();
    let comments = state.comments.for_post(post.id).await?;
    let likes = state.posts.like_count(post.id).await?;
    let tags = state.tags.for_post(post.id).await?;

    let (popular_tags, most_popular_posts) = sidebar(&state).await?;

    let details = PostDetails {
        post: &post,
        author: &author,
        comments: &comments,
        likes,
        tags: &tags,
    };
    let context = PostDetailContext {
        post: views::post_page(details, &state.site),
        popular_tags,
        most_popular_posts,
    };
    render(&state, "post-details.html", &context)
}

/// GET /tag/{tag_title}
pub async fn tag_filter(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let raw = path.into_inner();
    let not_found = || AppError::NotFound(format!("tag '{}' not found", raw));

    // A title that cannot be stored cannot match an existing tag.
    let title = Tag::normalize_title(&raw).map_err(|_| not_found())?;
    let tag = state
        .tags
        .find_by_title(&title)
        .await?
        .ok_or_else(not_found)?;

    let posts = state.posts.tagged(tag.id, state.site.tag_page_size).await?;
    let (popular_tags, most_popular_posts) = sidebar(&state).await?;

    let context = TagFilterContext {
        tag: tag.title,
        popular_tags,
        posts: views::post_cards(&posts, &state.site),
        most_popular_posts,
    };
    render(&state, "posts-list.html", &context)
}

/// GET /contacts
pub async fn contacts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let body = state
        .templates
        .render("contacts.html", &tera::Context::new())?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}
