//! Form validators - turn raw submitted text into cleaned values.
//!
//! Every validator trims boundary whitespace before checking lengths and
//! counts characters, not bytes.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// A single field failure with a stable code and a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Field name to messages, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<&'static str, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &'static str, error: impl ToString) {
        self.0.entry(field).or_default().push(error.to_string());
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn single(field: &'static str, error: impl ToString) -> Self {
        let mut errors = Self::default();
        errors.add(field, error);
        errors
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Comment submission validator.
pub struct CommentForm;

impl CommentForm {
    pub const MIN_LENGTH: usize = 10;
    pub const MAX_LENGTH: usize = 1000;

    /// Clean raw comment text, returning the trimmed content.
    pub fn clean(raw: &str) -> Result<String, ValidationError> {
        let content = raw.trim();
        let length = content.chars().count();

        if length < Self::MIN_LENGTH {
            return Err(ValidationError::new(
                "too_short",
                format!(
                    "Comment must be at least {} characters long.",
                    Self::MIN_LENGTH
                ),
            ));
        }

        if length > Self::MAX_LENGTH {
            return Err(ValidationError::new(
                "too_long",
                format!("Comment cannot exceed {} characters.", Self::MAX_LENGTH),
            ));
        }

        Ok(content.to_string())
    }
}

/// Cleaned post submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
}

impl PostForm {
    pub const TITLE_MAX_LENGTH: usize = 200;
    pub const EXCERPT_MAX_LENGTH: usize = 500;

    pub fn clean(title: &str, content: &str, excerpt: &str) -> Result<Self, FormErrors> {
        let mut errors = FormErrors::default();

        let title = title.trim();
        if title.is_empty() {
            errors.add("title", "This field is required.");
        } else if title.chars().count() > Self::TITLE_MAX_LENGTH {
            errors.add(
                "title",
                format!("Title cannot exceed {} characters.", Self::TITLE_MAX_LENGTH),
            );
        }

        let content = content.trim();
        if content.is_empty() {
            errors.add("content", "This field is required.");
        }

        let excerpt = excerpt.trim();
        if excerpt.chars().count() > Self::EXCERPT_MAX_LENGTH {
            errors.add(
                "excerpt",
                format!(
                    "Excerpt cannot exceed {} characters.",
                    Self::EXCERPT_MAX_LENGTH
                ),
            );
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            title: title.to_string(),
            content: content.to_string(),
            excerpt: (!excerpt.is_empty()).then(|| excerpt.to_string()),
        })
    }
}

/// Cleaned account registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub const USERNAME_MIN_LENGTH: usize = 3;
    pub const USERNAME_MAX_LENGTH: usize = 150;
    pub const PASSWORD_MIN_LENGTH: usize = 8;

    pub fn clean(username: &str, email: &str, password: &str) -> Result<Self, FormErrors> {
        let mut errors = FormErrors::default();

        let username = username.trim();
        let username_length = username.chars().count();
        if !(Self::USERNAME_MIN_LENGTH..=Self::USERNAME_MAX_LENGTH).contains(&username_length) {
            errors.add(
                "username",
                format!(
                    "Username must be between {} and {} characters.",
                    Self::USERNAME_MIN_LENGTH,
                    Self::USERNAME_MAX_LENGTH
                ),
            );
        } else if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_.@+-".contains(c))
        {
            errors.add(
                "username",
                "Username may contain only letters, digits and _.@+- characters.",
            );
        }

        let email = email.trim().to_lowercase();
        let looks_valid = email
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
            .unwrap_or(false);
        if !looks_valid {
            errors.add("email", "Enter a valid email address.");
        }

        if password.chars().count() < Self::PASSWORD_MIN_LENGTH {
            errors.add(
                "password",
                format!(
                    "Password must be at least {} characters.",
                    Self::PASSWORD_MIN_LENGTH
                ),
            );
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            username: username.to_string(),
            email,
            password: password.to_string(),
        })
    }
}
