//! # Blog Core
//!
//! The domain layer of the Inkwell blog backend.
//! Entities, validation rules and repository ports live here; there are no
//! infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError};
