use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Post, User, post::detail_url};

/// Comment entity - free text attached to a post by its author.
///
/// New comments start unapproved and stay hidden from the public list until
/// a moderator flips `approved`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, user_id: Uuid, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            content,
            approved: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the content; the approval flag is left alone.
    pub fn edit(&mut self, content: String) {
        self.content = content;
        self.updated_at = Utc::now();
    }

    /// Human readable label, e.g. `Comment by alice on Hello`.
    pub fn label(&self, author: &User, post: &Post) -> String {
        format!("Comment by {} on {}", author.username, post.title)
    }

    /// Comments link to the detail page of their post.
    pub fn absolute_url(&self, post: &Post) -> String {
        detail_url(&post.slug)
    }
}
