//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//! Every repository is backed by SeaORM and runs against PostgreSQL or
//! SQLite, whichever the connection URL names.

pub mod database;

pub use database::{
    DatabaseConfig, SeaOrmCommentRepository, SeaOrmPostRepository, SeaOrmTagRepository,
    SeaOrmUserRepository, connect,
};
