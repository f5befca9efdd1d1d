//! Application state - shared across all handlers.

use std::sync::Arc;

use sea_orm::DbConn;
use tera::Tera;

use blog_core::ports::{CommentRepository, PostRepository, TagRepository, UserRepository};
use blog_infra::{
    SeaOrmCommentRepository, SeaOrmPostRepository, SeaOrmTagRepository, SeaOrmUserRepository,
};

use crate::config::SiteConfig;
use crate::templates;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub db: DbConn,
    pub templates: Arc<Tera>,
    pub site: SiteConfig,
}

impl AppState {
    /// Wire the repositories to `db` and compile the templates.
    pub fn new(db: DbConn, site: SiteConfig) -> Result<Self, tera::Error> {
        let templates = Arc::new(templates::load()?);

        tracing::info!("Application state initialized");

        Ok(Self {
            users: Arc::new(SeaOrmUserRepository::new(db.clone())),
            posts: Arc::new(SeaOrmPostRepository::new(db.clone())),
            tags: Arc::new(SeaOrmTagRepository::new(db.clone())),
            comments: Arc::new(SeaOrmCommentRepository::new(db.clone())),
            db,
            templates,
            site,
        })
    }
}
