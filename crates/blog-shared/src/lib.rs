//! # Blog Shared
//!
//! Plain records exchanged with templates and admin API clients.

pub mod dto;
pub mod pages;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
