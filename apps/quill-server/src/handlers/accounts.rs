//! Login, registration and logout.

use actix_web::{HttpResponse, http::header, web};
use minijinja::context;

use quill_core::domain::User;
use quill_core::error::RepoError;
use quill_core::forms::{FormErrors, SignupForm};
use quill_core::ports::{BaseRepository, UserRepository};
use quill_shared::dto::{LoginFormData, NextQuery, RegisterFormData};

use super::page;
use crate::middleware::auth::{
    HOME_URL, OptionalIdentity, expired_session_cookie, safe_next, session_cookie,
};
use crate::middleware::error::AppResult;
use crate::state::AppState;

const BAD_LOGIN: &str = "Please enter a correct username and password.";

/// Issue a session cookie for `user` and send them on to `next`.
fn start_session(state: &AppState, user: &User, next: &str) -> AppResult<HttpResponse> {
    let token = state.tokens.generate_token(user.id, &user.username)?;
    let cookie = session_cookie(
        token,
        state.tokens.expiration_seconds(),
        state.secure_cookies,
    );

    tracing::info!(user_id = %user.id, "Session started");
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, next))
        .cookie(cookie)
        .finish())
}

fn render_login(
    state: &AppState,
    identity: &OptionalIdentity,
    next: &str,
    username: &str,
    error: Option<&str>,
) -> AppResult<HttpResponse> {
    let html = state.views.render(
        "login.html",
        context! {
            username => identity.username(),
            next,
            form_username => username,
            error,
        },
    )?;
    Ok(page(html))
}

/// GET /accounts/login/?next=
pub async fn login_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<NextQuery>,
) -> AppResult<HttpResponse> {
    render_login(&state, &identity, safe_next(query.next.as_deref()), "", None)
}

/// POST /accounts/login/
pub async fn login(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    form: web::Form<LoginFormData>,
) -> AppResult<HttpResponse> {
    let next = safe_next(form.next.as_deref());
    let username = form.username.trim();

    if let Some(user) = state.users.find_by_username(username).await? {
        if user.has_usable_password()
            && state.passwords.verify(&form.password, &user.password_hash)?
        {
            return start_session(&state, &user, next);
        }
    }

    tracing::warn!(username = %username, "Failed login attempt");
    render_login(&state, &identity, next, username, Some(BAD_LOGIN))
}

fn render_register(
    state: &AppState,
    identity: &OptionalIdentity,
    next: &str,
    form: &RegisterFormData,
    errors: &FormErrors,
) -> AppResult<HttpResponse> {
    let html = state.views.render(
        "register.html",
        context! {
            username => identity.username(),
            next,
            form => context! { username => &form.username, email => &form.email },
            errors,
        },
    )?;
    Ok(page(html))
}

/// GET /accounts/register/?next=
pub async fn register_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<NextQuery>,
) -> AppResult<HttpResponse> {
    render_register(
        &state,
        &identity,
        safe_next(query.next.as_deref()),
        &RegisterFormData::default(),
        &FormErrors::default(),
    )
}

/// POST /accounts/register/ - create the account and log straight in.
pub async fn register(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    form: web::Form<RegisterFormData>,
) -> AppResult<HttpResponse> {
    let next = safe_next(form.next.as_deref());

    let signup = match SignupForm::clean(&form.username, &form.email, &form.password) {
        Ok(signup) => signup,
        Err(errors) => return render_register(&state, &identity, next, &form, &errors),
    };

    let mut errors = FormErrors::default();
    if state.users.find_by_username(&signup.username).await?.is_some() {
        errors.add("username", "A user with that username already exists.");
    }
    if state.users.find_by_email(&signup.email).await?.is_some() {
        errors.add("email", "A user with that email already exists.");
    }
    if !errors.is_empty() {
        return render_register(&state, &identity, next, &form, &errors);
    }

    let password_hash = state.passwords.hash(&signup.password)?;

    let user = match state
        .users
        .save(User::new(signup.username, signup.email, password_hash))
        .await
    {
        Ok(user) => user,
        Err(RepoError::Constraint(_)) => {
            let errors = FormErrors::single("username", "That username or email is already taken.");
            return render_register(&state, &identity, next, &form, &errors);
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = %user.id, "User registered");
    start_session(&state, &user, next)
}

/// POST /accounts/logout/
pub async fn logout() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, HOME_URL))
        .cookie(expired_session_cookie())
        .finish()
}
