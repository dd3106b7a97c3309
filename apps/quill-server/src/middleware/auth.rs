//! Session extractors and login redirects.
//!
//! The session token is read from the `quill_session` cookie, falling back to
//! an `Authorization: Bearer` header. Handlers take [`OptionalIdentity`] and
//! decide themselves how to treat anonymous callers: pages redirect to the
//! login form, the AJAX endpoint answers 401.

use std::convert::Infallible;
use std::future::{Ready, ready};
use std::sync::Arc;

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, http::header, web};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use uuid::Uuid;

use quill_core::ports::{AuthError, TokenClaims, TokenService};

pub const SESSION_COOKIE: &str = "quill_session";
pub const LOGIN_URL: &str = "/accounts/login/";
pub const HOME_URL: &str = "/blog/";

/// Characters escaped in a `next` query value; path separators stay readable.
const NEXT_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// The logged-in user, as named by a valid session token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn identify(req: &HttpRequest) -> Option<Identity> {
    let Some(tokens) = req.app_data::<web::Data<Arc<dyn TokenService>>>() else {
        tracing::error!("TokenService not registered; treating every request as anonymous");
        return None;
    };

    let token = session_token(req)?;
    match tokens.validate_token(&token) {
        Ok(claims) => Some(Identity::from(claims)),
        Err(AuthError::TokenExpired) => {
            tracing::debug!("Session expired");
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring invalid session token");
            None
        }
    }
}

/// Extractor for the current visitor: anonymous when the session is
/// missing, expired or forged. Never rejects a request.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|identity| identity.user_id)
    }

    pub fn username(&self) -> Option<&str> {
        self.0.as_ref().map(|identity| identity.username.as_str())
    }
}

impl FromRequest for OptionalIdentity {
    type Error = Infallible;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(identify(req))))
    }
}

/// 302 to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// 302 to the login page, coming back to the current path afterwards.
pub fn login_redirect(req: &HttpRequest) -> HttpResponse {
    let next = match req.uri().path_and_query() {
        Some(pq) => pq.as_str(),
        None => req.path(),
    };
    redirect(&login_url(next))
}

pub fn login_url(next: &str) -> String {
    format!("{}?next={}", LOGIN_URL, utf8_percent_encode(next, NEXT_VALUE))
}

/// Where to go after logging in. Only local absolute paths are honoured.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') =>
        {
            path
        }
        _ => HOME_URL,
    }
}

pub fn session_cookie(token: String, max_age_seconds: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(max_age_seconds))
        .finish()
}

pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .max_age(Duration::ZERO)
        .finish()
}
