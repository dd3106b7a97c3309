//! Post list, detail with comment submission, and post creation.

use actix_web::{HttpRequest, HttpResponse, web};
use minijinja::context;

use quill_core::forms::{FormErrors, PostForm};
use quill_core::ports::{BaseRepository, PostQuery};
use quill_core::services::CommentError;
use quill_shared::dto::{CommentFormData, PostFormData, PostListQuery};

use super::page;
use crate::middleware::auth::{OptionalIdentity, login_redirect, redirect};
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views::{Pager, PostCard, detail_context};

/// GET /blog/?search=&page=
pub async fn list(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let post_query = PostQuery {
        search: query.search.clone(),
        page: query.page.unwrap_or(1),
        per_page: state.posts_per_page,
    };

    let listing = state.post_service.list(&post_query).await?;

    let html = state.views.render(
        "post_list.html",
        context! {
            username => identity.username(),
            search => post_query.search_term(),
            posts => PostCard::from_listing(&listing),
            pager => Pager::from_listing(&listing),
        },
    )?;
    Ok(page(html))
}

/// GET /blog/{slug}/
pub async fn detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let detail = state.post_service.detail(&path.into_inner()).await?;
    let (post, comments) = detail_context(&detail, identity.user_id());

    let html = state.views.render(
        "post_detail.html",
        context! {
            username => identity.username(),
            post,
            comments,
            errors => Vec::<String>::new(),
        },
    )?;
    Ok(page(html))
}

/// POST /blog/{slug}/ - submit a comment for moderation.
pub async fn comment(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    form: web::Form<CommentFormData>,
) -> AppResult<HttpResponse> {
    let post = state.post_service.get(&path.into_inner()).await?;

    let Some(user_id) = identity.user_id() else {
        return Ok(login_redirect(&req));
    };

    match state
        .comment_service
        .submit(&post, user_id, &form.content)
        .await
    {
        Ok(_) => Ok(redirect(&post.absolute_url())),
        Err(CommentError::Invalid(error)) => {
            let detail = state.post_service.detail_of(post).await?;
            let (post, comments) = detail_context(&detail, Some(user_id));

            let html = state.views.render(
                "post_detail.html",
                context! {
                    username => identity.username(),
                    post,
                    comments,
                    errors => vec![error.message],
                    content => &form.content,
                },
            )?;
            Ok(page(html))
        }
        Err(e) => Err(e.into()),
    }
}

fn render_post_form(
    state: &AppState,
    username: Option<&str>,
    form: &PostFormData,
    errors: &FormErrors,
) -> AppResult<HttpResponse> {
    let html = state.views.render(
        "post_form.html",
        context! { username, form, errors },
    )?;
    Ok(page(html))
}

/// GET /blog/new/
pub async fn new_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    if identity.0.is_none() {
        return Ok(login_redirect(&req));
    }

    render_post_form(
        &state,
        identity.username(),
        &PostFormData::default(),
        &FormErrors::default(),
    )
}

/// POST /blog/new/
pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    form: web::Form<PostFormData>,
) -> AppResult<HttpResponse> {
    let Some(user_id) = identity.user_id() else {
        return Ok(login_redirect(&req));
    };
    let Some(author) = state.users.find_by_id(user_id).await? else {
        tracing::warn!(user_id = %user_id, "Session refers to a missing user");
        return Ok(login_redirect(&req));
    };

    let cleaned = match PostForm::clean(&form.title, &form.content, &form.excerpt) {
        Ok(cleaned) => cleaned,
        Err(errors) => return render_post_form(&state, identity.username(), &form, &errors),
    };

    let post = state.post_service.create(&author, cleaned).await?;
    Ok(redirect(&post.absolute_url()))
}
