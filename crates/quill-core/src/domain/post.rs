use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Comment;

/// Number of content characters kept when deriving an excerpt.
pub const EXCERPT_LENGTH: usize = 200;

/// Marker appended to a derived excerpt when the content was cut.
pub const ELLIPSIS: &str = "...";

/// Post entity - a blog post addressed by its slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post.
    pub fn new(
        author_id: Uuid,
        title: String,
        slug: String,
        content: String,
        excerpt: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            slug,
            content,
            excerpt,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stored excerpt when present, otherwise the head of the content.
    ///
    /// Content longer than [`EXCERPT_LENGTH`] characters is cut and suffixed
    /// with [`ELLIPSIS`].
    pub fn get_excerpt(&self) -> String {
        if let Some(excerpt) = self.excerpt.as_deref().filter(|e| !e.is_empty()) {
            return excerpt.to_string();
        }

        if self.content.chars().count() > EXCERPT_LENGTH {
            let mut head: String = self.content.chars().take(EXCERPT_LENGTH).collect();
            head.push_str(ELLIPSIS);
            head
        } else {
            self.content.clone()
        }
    }

    /// Approved comments belonging to this post, oldest first.
    pub fn approved_comments<'a, I>(&self, comments: I) -> Vec<&'a Comment>
    where
        I: IntoIterator<Item = &'a Comment>,
    {
        let mut approved: Vec<&Comment> = comments
            .into_iter()
            .filter(|c| c.post_id == self.id && c.approved)
            .collect();
        approved.sort_by_key(|c| c.created_at);
        approved
    }

    pub fn absolute_url(&self) -> String {
        detail_url(&self.slug)
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// URL of the detail page for a slug.
pub fn detail_url(slug: &str) -> String {
    format!("/blog/{}/", slug)
}
