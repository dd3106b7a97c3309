//! Author-only comment edit and delete, plus the XHR delete.

use actix_web::{HttpRequest, HttpResponse, http::header, web};
use minijinja::context;
use uuid::Uuid;

use quill_core::domain::Comment;
use quill_core::ports::BaseRepository;
use quill_core::services::CommentError;
use quill_shared::CommentDeleteResponse;
use quill_shared::dto::CommentFormData;

use super::page;
use crate::middleware::auth::{HOME_URL, OptionalIdentity, login_redirect, redirect};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views::CommentTarget;

/// Detail page of the comment's post, or the list when the post is gone.
async fn post_url(state: &AppState, post_id: Uuid) -> AppResult<String> {
    Ok(state
        .posts
        .find_by_id(post_id)
        .await?
        .map(|post| post.absolute_url())
        .unwrap_or_else(|| HOME_URL.to_string()))
}

/// How the HTML flow answers a refused modification.
async fn refuse(
    req: &HttpRequest,
    state: &AppState,
    err: CommentError,
) -> AppResult<HttpResponse> {
    match err {
        CommentError::Unauthenticated => Ok(login_redirect(req)),
        CommentError::NotOwner { post_id } => Ok(redirect(&post_url(state, post_id).await?)),
        other => Err(other.into()),
    }
}

async fn render_edit(
    state: &AppState,
    identity: &OptionalIdentity,
    comment: &Comment,
    content: &str,
    errors: Vec<String>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .find_by_id(comment.post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post '{}' not found", comment.post_id)))?;

    let html = state.views.render(
        "comment_edit.html",
        context! {
            username => identity.username(),
            comment => CommentTarget::new(comment, &post),
            content,
            errors,
        },
    )?;
    Ok(page(html))
}

/// GET /blog/comment/{id}/edit/
pub async fn edit_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comment_id = path.into_inner();

    match state
        .comment_service
        .authorize(comment_id, identity.user_id())
        .await
    {
        Ok(comment) => {
            render_edit(&state, &identity, &comment, &comment.content, Vec::new()).await
        }
        Err(e) => refuse(&req, &state, e).await,
    }
}

/// POST /blog/comment/{id}/edit/
pub async fn edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
    form: web::Form<CommentFormData>,
) -> AppResult<HttpResponse> {
    let comment_id = path.into_inner();

    match state
        .comment_service
        .edit(comment_id, identity.user_id(), &form.content)
        .await
    {
        Ok(comment) => Ok(redirect(&post_url(&state, comment.post_id).await?)),
        // Only reached after the ownership gate passed.
        Err(CommentError::Invalid(error)) => {
            let comment = state
                .comments
                .find_by_id(comment_id)
                .await?
                .ok_or(CommentError::NotFound(comment_id))?;
            render_edit(&state, &identity, &comment, &form.content, vec![error.message]).await
        }
        Err(e) => refuse(&req, &state, e).await,
    }
}

/// GET /blog/comment/{id}/delete/ - confirmation page.
pub async fn delete_confirm(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comment = match state
        .comment_service
        .authorize(path.into_inner(), identity.user_id())
        .await
    {
        Ok(comment) => comment,
        Err(e) => return refuse(&req, &state, e).await,
    };

    let post = state
        .posts
        .find_by_id(comment.post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post '{}' not found", comment.post_id)))?;

    let html = state.views.render(
        "comment_delete.html",
        context! {
            username => identity.username(),
            comment => CommentTarget::new(&comment, &post),
        },
    )?;
    Ok(page(html))
}

/// POST /blog/comment/{id}/delete/
pub async fn delete(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    match state
        .comment_service
        .delete(path.into_inner(), identity.user_id())
        .await
    {
        Ok(comment) => Ok(redirect(&post_url(&state, comment.post_id).await?)),
        Err(e) => refuse(&req, &state, e).await,
    }
}

fn is_xhr(req: &HttpRequest) -> bool {
    req.headers()
        .get("X-Requested-With")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("XMLHttpRequest"))
}

/// POST /blog/comment/{id}/delete-ajax/
///
/// Same rules as the interactive delete, answered with a status code and a
/// `{"success", "message"}` body instead of a redirect.
pub async fn delete_ajax(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
) -> HttpResponse {
    if !is_xhr(&req) {
        return HttpResponse::BadRequest().json(CommentDeleteResponse::failed("Invalid request."));
    }

    let Ok(comment_id) = Uuid::parse_str(&path) else {
        return HttpResponse::NotFound().json(CommentDeleteResponse::failed("Comment not found."));
    };
    let result = state
        .comment_service
        .delete(comment_id, identity.user_id())
        .await;

    match result {
        Ok(_) => HttpResponse::Ok().json(CommentDeleteResponse::deleted()),
        Err(CommentError::Unauthenticated) => HttpResponse::Unauthorized()
            .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
            .json(CommentDeleteResponse::failed("Authentication required.")),
        Err(CommentError::NotOwner { .. }) => HttpResponse::Forbidden().json(
            CommentDeleteResponse::failed("You can only delete your own comments."),
        ),
        Err(CommentError::NotFound(_)) => {
            HttpResponse::NotFound().json(CommentDeleteResponse::failed("Comment not found."))
        }
        Err(e) => {
            tracing::error!(comment_id = %comment_id, error = %e, "XHR comment delete failed");
            HttpResponse::InternalServerError()
                .json(CommentDeleteResponse::failed("Could not delete the comment."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_is_xhr() {
        let req = TestRequest::default()
            .insert_header(("X-Requested-With", "XMLHttpRequest"))
            .to_http_request();
        assert!(is_xhr(&req));

        assert!(!is_xhr(&TestRequest::default().to_http_request()));
    }
}
