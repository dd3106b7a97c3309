//! The about page.

use actix_web::{HttpResponse, web};
use minijinja::context;

use quill_core::domain::DEFAULT_ABOUT_TITLE;

use super::page;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /about/ - the earliest about record, or an empty default page.
pub async fn about(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let (title, content) = match state.abouts.current().await? {
        Some(about) => (about.title, about.content),
        None => (DEFAULT_ABOUT_TITLE.to_string(), String::new()),
    };

    let html = state.views.render(
        "about.html",
        context! { username => identity.username(), title, content },
    )?;
    Ok(page(html))
}
