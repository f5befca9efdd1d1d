use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DbConn, DbErr};

/// Configuration for the blog database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub sqlx_logging: bool,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 2,
            sqlx_logging: true,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:")
    }
}

/// Open the connection pool.
///
/// An in-memory SQLite database lives inside a single connection: for such
/// URLs the pool holds exactly one connection that is never reaped.
pub async fn connect(config: &DatabaseConfig) -> Result<DbConn, DbErr> {
    let (max, min) = if config.is_in_memory() {
        (1, 1)
    } else {
        (config.max_connections, config.min_connections)
    };

    let mut opts = ConnectOptions::new(&config.url);
    opts.max_connections(max)
        .min_connections(min)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(config.sqlx_logging);
    if !config.is_in_memory() {
        opts.idle_timeout(Duration::from_secs(300));
    }

    let conn = Database::connect(opts).await?;
    tracing::info!(
        backend = ?conn.get_database_backend(),
        pool = max,
        "Database connected"
    );

    Ok(conn)
}
