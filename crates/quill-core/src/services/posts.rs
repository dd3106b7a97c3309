//! Post listing, detail assembly and authoring.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Comment, Post, User};
use crate::error::DomainError;
use crate::forms::PostForm;
use crate::ports::{CommentRepository, Page, PostQuery, PostRepository, UserRepository};

/// Shown in place of an author that no longer resolves.
pub const UNKNOWN_AUTHOR: &str = "[deleted]";

/// A page of posts with their authors' usernames.
#[derive(Debug, Clone)]
pub struct PostListing {
    pub page: Page<Post>,
    pub authors: HashMap<Uuid, String>,
}

impl PostListing {
    pub fn author_of(&self, post: &Post) -> &str {
        self.authors
            .get(&post.author_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_AUTHOR)
    }
}

/// An approved comment paired with its author's username.
#[derive(Debug, Clone)]
pub struct CommentEntry {
    pub comment: Comment,
    pub author: String,
}

/// Everything the detail page shows.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Post,
    pub author: String,
    pub comments: Vec<CommentEntry>,
}

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            posts,
            comments,
            users,
        }
    }

    pub async fn list(&self, query: &PostQuery) -> Result<PostListing, DomainError> {
        let page = self.posts.search(query).await?;
        let ids: Vec<Uuid> = page.items.iter().map(|p| p.author_id).collect();
        let authors = self.usernames(&ids).await?;

        tracing::debug!(
            search = ?query.search_term(),
            page = page.number,
            results = page.items.len(),
            "Listed posts"
        );
        Ok(PostListing { page, authors })
    }

    /// Look a post up by slug; unknown slugs are `NotFound`.
    pub async fn get(&self, slug: &str) -> Result<Post, DomainError> {
        self.posts
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", slug))
    }

    pub async fn detail(&self, slug: &str) -> Result<PostDetail, DomainError> {
        let post = self.get(slug).await?;
        self.detail_of(post).await
    }

    /// Assemble the detail view for an already loaded post.
    pub async fn detail_of(&self, post: Post) -> Result<PostDetail, DomainError> {
        let comments = self.comments.find_approved_by_post(post.id).await?;
        let approved = post.approved_comments(&comments);

        let mut ids: Vec<Uuid> = approved.iter().map(|c| c.user_id).collect();
        ids.push(post.author_id);
        let names = self.usernames(&ids).await?;
        let name = |id: &Uuid| {
            names
                .get(id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
        };

        let comments = approved
            .into_iter()
            .map(|c| CommentEntry {
                author: name(&c.user_id),
                comment: c.clone(),
            })
            .collect();

        Ok(PostDetail {
            author: name(&post.author_id),
            post,
            comments,
        })
    }

    /// Create a post with a slug derived from its title.
    pub async fn create(&self, author: &User, form: PostForm) -> Result<Post, DomainError> {
        let slug = self.unique_slug(&form.title).await?;
        let post = Post::new(author.id, form.title, slug, form.content, form.excerpt);
        let post = self.posts.save(post).await?;

        tracing::info!(post_id = %post.id, slug = %post.slug, user_id = %author.id, "Post created");
        Ok(post)
    }

    /// Slugified title, suffixed with `-2`, `-3`, ... until free.
    pub async fn unique_slug(&self, title: &str) -> Result<String, DomainError> {
        let base = slugify_title(title);
        let mut candidate = base.clone();
        let mut suffix = 2;

        while self.posts.slug_exists(&candidate).await? {
            candidate = format!("{}-{}", base, suffix);
            suffix += 1;
        }

        Ok(candidate)
    }

    async fn usernames(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, DomainError> {
        let mut ids = ids.to_vec();
        ids.sort();
        ids.dedup();

        let users = self.users.find_many(&ids).await?;
        Ok(users.into_iter().map(|u| (u.id, u.username)).collect())
    }
}

/// URL-safe slug for a title; titles without any usable character become `post`.
pub fn slugify_title(title: &str) -> String {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        "post".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_title() {
        assert_eq!(slugify_title("Test Post"), "test-post");
        assert_eq!(slugify_title("  Hello, World!  "), "hello-world");
        assert_eq!(slugify_title("!!!"), "post");
    }
}
