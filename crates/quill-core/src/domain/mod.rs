//! Domain entities - the core business objects.

mod about;
mod comment;
mod post;
mod user;

pub use about::{About, DEFAULT_ABOUT_TITLE};
pub use comment::Comment;
pub use post::{ELLIPSIS, EXCERPT_LENGTH, Post, detail_url};
pub use user::{UNUSABLE_PASSWORD, User};
