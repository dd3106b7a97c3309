//! Domain services - orchestration over the ports.

mod comments;
mod posts;

pub use comments::{CommentError, CommentService, can_modify};
pub use posts::{
    CommentEntry, PostDetail, PostListing, PostService, UNKNOWN_AUTHOR, slugify_title,
};
