//! Handler errors and their RFC 7807 bodies.
//!
//! Form problems never reach this type: handlers redisplay the form. What
//! lands here is a missing resource, a refused AJAX call or a failure the
//! user cannot fix.

use actix_web::error::PathError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};

use quill_core::error::{DomainError, RepoError};
use quill_core::ports::AuthError;
use quill_core::services::CommentError;
use quill_shared::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Not the author")]
    Forbidden,

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The message is logged, never sent.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let problem = ErrorResponse::new(status.as_u16());
        let body = match self {
            Self::NotFound(detail) | Self::BadRequest(detail) | Self::Conflict(detail) => {
                problem.with_detail(detail)
            }
            Self::Unauthorized | Self::Forbidden => problem.with_detail(self.to_string()),
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                problem
            }
        };

        HttpResponse::build(status).json(body)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { .. } => Self::NotFound(err.to_string()),
            DomainError::Duplicate(msg) => Self::Conflict(msg),
            DomainError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => Self::Conflict(msg),
            RepoError::Connection(_) | RepoError::Query(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<CommentError> for AppError {
    fn from(err: CommentError) -> Self {
        match err {
            CommentError::Unauthenticated => Self::Unauthorized,
            CommentError::NotFound(_) => Self::NotFound(err.to_string()),
            CommentError::NotOwner { .. } => Self::Forbidden,
            CommentError::Invalid(e) => Self::BadRequest(e.message),
            CommentError::Repo(e) => e.into(),
        }
    }
}

/// Hashing failures are ours; anything else means bad credentials.
impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::HashingError(_) => Self::Internal(err.to_string()),
            _ => Self::Unauthorized,
        }
    }
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        Self::Internal(format!("Template rendering failed: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// A path segment that does not parse (a malformed comment id) names no
/// resource: answer 404 without echoing the parser's message.
pub fn path_error(err: PathError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(path = %req.path(), error = %err, "Unmatched path parameter");
    AppError::NotFound(format!("Nothing at {}", req.path())).into()
}
