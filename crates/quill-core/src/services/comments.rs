//! Comment submission and author-only moderation.
//!
//! Every mutation goes through [`CommentService::authorize`], which applies
//! [`can_modify`] before anything is written. The service never decides how a
//! refusal is presented; callers map [`CommentError`] to a redirect or a
//! status code.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Comment, Post};
use crate::error::RepoError;
use crate::forms::{CommentForm, ValidationError};
use crate::ports::CommentRepository;

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Comment {0} not found")]
    NotFound(Uuid),

    #[error("Only the author may modify this comment")]
    NotOwner { post_id: Uuid },

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Only the author of a comment may edit or delete it.
pub fn can_modify(user_id: Uuid, comment: &Comment) -> bool {
    comment.user_id == user_id
}

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>) -> Self {
        Self { comments }
    }

    /// Store a new, unapproved comment on `post`.
    pub async fn submit(&self, post: &Post, actor: Uuid, raw: &str) -> Result<Comment, CommentError> {
        let content = CommentForm::clean(raw)?;
        let comment = self
            .comments
            .save(Comment::new(post.id, actor, content))
            .await?;

        tracing::info!(
            comment_id = %comment.id,
            post_id = %post.id,
            user_id = %actor,
            "Comment submitted for moderation"
        );
        Ok(comment)
    }

    /// Resolve a comment the actor is allowed to modify.
    pub async fn authorize(
        &self,
        comment_id: Uuid,
        actor: Option<Uuid>,
    ) -> Result<Comment, CommentError> {
        let user_id = actor.ok_or(CommentError::Unauthenticated)?;

        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or(CommentError::NotFound(comment_id))?;

        if !can_modify(user_id, &comment) {
            tracing::warn!(
                comment_id = %comment_id,
                user_id = %user_id,
                "Refusing modification by non-author"
            );
            return Err(CommentError::NotOwner {
                post_id: comment.post_id,
            });
        }

        Ok(comment)
    }

    /// Replace the content of an owned comment. Approval is unchanged.
    pub async fn edit(
        &self,
        comment_id: Uuid,
        actor: Option<Uuid>,
        raw: &str,
    ) -> Result<Comment, CommentError> {
        let mut comment = self.authorize(comment_id, actor).await?;
        let content = CommentForm::clean(raw)?;

        comment.edit(content);
        let comment = self.comments.save(comment).await?;

        tracing::info!(comment_id = %comment.id, "Comment edited");
        Ok(comment)
    }

    /// Delete an owned comment and hand it back to the caller.
    pub async fn delete(&self, comment_id: Uuid, actor: Option<Uuid>) -> Result<Comment, CommentError> {
        let comment = self.authorize(comment_id, actor).await?;

        match self.comments.delete(comment.id).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => return Err(CommentError::NotFound(comment_id)),
            Err(e) => return Err(e.into()),
        }

        tracing::info!(comment_id = %comment.id, post_id = %comment.post_id, "Comment deleted");
        Ok(comment)
    }
}
