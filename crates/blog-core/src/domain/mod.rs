//! Domain entities - the core business objects.

mod comment;
mod post;
mod summary;
mod tag;
mod user;

pub use comment::Comment;
pub use post::{Post, PostDraft, SLUG_MAX_LEN, TITLE_MAX_LEN};
pub use summary::{CommentEntry, PostSummary, TagStats};
pub use tag::{TAG_TITLE_MAX_LEN, Tag};
pub use user::User;
