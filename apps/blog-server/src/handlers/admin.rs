//! Admin console API - JSON CRUD over users, tags, posts and comments.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use blog_core::domain::{Comment, Post, PostDraft, Tag, User};
use blog_core::error::DomainError;
use blog_shared::ApiResponse;
use blog_shared::dto::{
    CommentResponse, CreateCommentRequest, CreateTagRequest, CreateUserRequest, LikeRequest,
    LikesResponse, PostRequest, PostResponse, SetTagsRequest, TagResponse, UserResponse,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn user_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        is_staff: user.is_staff,
        created_at: user.created_at,
    }
}

fn comment_response(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        author_id: comment.author_id,
        text: comment.text,
        published_at: comment.published_at,
    }
}

async fn post_response(state: &AppState, post: Post) -> AppResult<PostResponse> {
    let tags = state.tags.for_post(post.id).await?;
    let likes_amount = state.posts.like_count(post.id).await?;

    Ok(PostResponse {
        url: post.url(),
        id: post.id,
        author_id: post.author_id,
        title: post.title,
        text: post.text,
        slug: post.slug,
        image: post.image,
        published_at: post.published_at,
        tags: tags
            .into_iter()
            .map(|stats| TagResponse {
                id: stats.tag.id,
                title: stats.tag.title,
                posts_with_tag: Some(stats.post_count),
            })
            .collect(),
        likes_amount,
    })
}

async fn require_post(state: &AppState, id: Uuid) -> AppResult<Post> {
    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", id).into())
}

/// Referenced users must exist; a dangling reference is invalid input.
async fn require_user(state: &AppState, id: Uuid) -> AppResult<User> {
    state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::Validation(format!("user {} does not exist", id)))
}

async fn require_staff(state: &AppState, id: Uuid) -> AppResult<User> {
    let user = require_user(state, id).await?;
    if !user.is_staff {
        return Err(AppError::Validation(format!(
            "user '{}' is not staff and cannot author posts",
            user.username
        )));
    }
    Ok(user)
}

async fn require_tags(state: &AppState, ids: &[Uuid]) -> AppResult<()> {
    for id in ids {
        if state.tags.find_by_id(*id).await?.is_none() {
            return Err(AppError::Validation(format!("tag {} does not exist", id)));
        }
    }
    Ok(())
}

fn draft(req: &PostRequest) -> PostDraft {
    PostDraft {
        title: req.title.clone(),
        text: req.text.clone(),
        slug: req.slug.clone(),
        image: req.image.clone(),
        published_at: req.published_at,
    }
}

/// POST /admin/api/users
pub async fn create_user(
    state: web::Data<AppState>,
    body: web::Json<CreateUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let user = User::new(req.username, req.is_staff)?;
    let saved = state.users.create(user).await?;

    tracing::info!(user_id = %saved.id, staff = saved.is_staff, "User created");
    Ok(HttpResponse::Created().json(ApiResponse::ok(user_response(saved))))
}

/// GET /admin/api/users/{id}
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("user", id))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user_response(user))))
}

#[derive(Debug, Deserialize)]
pub struct ListTagsQuery {
    pub limit: Option<u64>,
}

/// GET /admin/api/tags
pub async fn list_tags(
    state: web::Data<AppState>,
    query: web::Query<ListTagsQuery>,
) -> AppResult<HttpResponse> {
    let limit = query.limit.unwrap_or(100).min(1000);
    let tags = state.tags.popular(limit).await?;

    let data: Vec<TagResponse> = tags
        .into_iter()
        .map(|stats| TagResponse {
            id: stats.tag.id,
            title: stats.tag.title,
            posts_with_tag: Some(stats.post_count),
        })
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(data)))
}

/// POST /admin/api/tags
pub async fn create_tag(
    state: web::Data<AppState>,
    body: web::Json<CreateTagRequest>,
) -> AppResult<HttpResponse> {
    let tag = Tag::new(&body.title)?;

    if state.tags.find_by_title(&tag.title).await?.is_some() {
        return Err(DomainError::Duplicate(format!("tag '{}' already exists", tag.title)).into());
    }
    let saved = state.tags.create(tag).await?;

    tracing::info!(tag = %saved.title, "Tag created");
    Ok(HttpResponse::Created().json(ApiResponse::ok(TagResponse {
        id: saved.id,
        title: saved.title,
        posts_with_tag: None,
    })))
}

/// DELETE /admin/api/tags/{id}
pub async fn delete_tag(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.tags.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /admin/api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let author = require_staff(&state, req.author_id).await?;
    if let Some(tags) = &req.tags {
        require_tags(&state, tags).await?;
    }

    let post = Post::new(author.id, draft(&req))?;
    if state.posts.find_by_slug(&post.slug).await?.is_some() {
        return Err(DomainError::Duplicate(format!("slug '{}' is taken", post.slug)).into());
    }
    let tags = req.tags.as_deref().unwrap_or_default();
    let saved = state.posts.create_with_tags(post, tags).await?;

    tracing::info!(post_id = %saved.id, slug = %saved.slug, "Post created");
    let response = post_response(&state, saved).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(response)))
}

/// GET /admin/api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = require_post(&state, path.into_inner()).await?;
    let response = post_response(&state, post).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(response)))
}

/// PUT /admin/api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let mut post = require_post(&state, path.into_inner()).await?;
    let author = require_staff(&state, req.author_id).await?;
    if let Some(tags) = &req.tags {
        require_tags(&state, tags).await?;
    }

    post.apply(draft(&req))?;
    post.author_id = author.id;

    if let Some(other) = state.posts.find_by_slug(&post.slug).await? {
        if other.id != post.id {
            return Err(DomainError::Duplicate(format!("slug '{}' is taken", post.slug)).into());
        }
    }
    let saved = state
        .posts
        .update_with_tags(post, req.tags.as_deref())
        .await?;

    tracing::info!(post_id = %saved.id, "Post updated");
    let response = post_response(&state, saved).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(response)))
}

/// DELETE /admin/api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.posts.delete(id).await?;

    tracing::info!(post_id = %id, "Post deleted with its comments");
    Ok(HttpResponse::NoContent().finish())
}

/// PUT /admin/api/posts/{id}/tags
pub async fn set_post_tags(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<SetTagsRequest>,
) -> AppResult<HttpResponse> {
    let post = require_post(&state, path.into_inner()).await?;
    require_tags(&state, &body.tags).await?;
    state.posts.set_tags(post.id, &body.tags).await?;

    let response = post_response(&state, post).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(response)))
}

/// POST /admin/api/posts/{id}/likes
pub async fn like_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<LikeRequest>,
) -> AppResult<HttpResponse> {
    let post = require_post(&state, path.into_inner()).await?;
    let user = require_user(&state, body.user_id).await?;
    state.posts.add_like(post.id, user.id).await?;

    let likes_amount = state.posts.like_count(post.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(LikesResponse {
        post_id: post.id,
        likes_amount,
    })))
}

/// DELETE /admin/api/posts/{id}/likes/{user_id}
pub async fn unlike_post(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, user_id) = path.into_inner();
    let post = require_post(&state, post_id).await?;
    state.posts.remove_like(post.id, user_id).await?;

    let likes_amount = state.posts.like_count(post.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(LikesResponse {
        post_id: post.id,
        likes_amount,
    })))
}

/// POST /admin/api/posts/{id}/comments
pub async fn create_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = require_post(&state, path.into_inner()).await?;
    let author = require_user(&state, req.author_id).await?;

    let comment = Comment::new(post.id, author.id, req.text)?;
    let saved = state.comments.create(comment).await?;

    tracing::info!(comment_id = %saved.id, post_id = %post.id, "Comment created");
    Ok(HttpResponse::Created().json(ApiResponse::ok(comment_response(saved))))
}

/// DELETE /admin/api/comments/{id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.comments.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
