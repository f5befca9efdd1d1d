//! Database connection management and repository implementations.

mod aggregates;
mod base;
mod connections;
mod post_repository;
mod repositories;

pub mod entity;

pub use base::SeaOrmRepository;
pub use connections::{DatabaseConfig, connect};
pub use post_repository::SeaOrmPostRepository;
pub use repositories::{SeaOrmCommentRepository, SeaOrmTagRepository, SeaOrmUserRepository};

#[cfg(test)]
mod tests;
