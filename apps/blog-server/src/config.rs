//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use blog_infra::DatabaseConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
}

/// Page sizes and media settings used when shaping pages.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Prefix joined with stored image references.
    pub media_url: String,
    pub popular_posts: u64,
    pub fresh_posts: u64,
    pub popular_tags: u64,
    pub tag_page_size: u64,
    pub teaser_length: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            media_url: "/media/".to_string(),
            popular_posts: 5,
            fresh_posts: 5,
            popular_tags: 5,
            tag_page_size: 20,
            teaser_length: 200,
        }
    }
}

impl SiteConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            media_url: env::var("MEDIA_URL").unwrap_or(defaults.media_url),
            popular_posts: parse_or("POPULAR_LIMIT", defaults.popular_posts),
            fresh_posts: parse_or("FRESH_LIMIT", defaults.fresh_posts),
            popular_tags: parse_or("POPULAR_TAGS_LIMIT", defaults.popular_tags),
            tag_page_size: parse_or("TAG_PAGE_SIZE", defaults.tag_page_size),
            teaser_length: parse_or("TEASER_LENGTH", defaults.teaser_length),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub run_migrations: bool,
    pub site: SiteConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let mut database = DatabaseConfig::new(url);
        database.max_connections = parse_or("DB_MAX_CONNECTIONS", database.max_connections);
        database.min_connections = parse_or("DB_MIN_CONNECTIONS", database.min_connections);

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080),
            database,
            run_migrations: env::var("RUN_MIGRATIONS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            site: SiteConfig::from_env(),
        })
    }
}

/// Parse an environment variable, falling back to `default` when it is
/// unset or malformed.
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
