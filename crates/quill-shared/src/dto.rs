//! Form bodies and query strings.

use serde::{Deserialize, Serialize};

/// Query string of the post list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<u64>,
}

/// Body of the comment form (create and edit).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentFormData {
    #[serde(default)]
    pub content: String,
}

/// Body of the post creation form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFormData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
}

/// Body of the login form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginFormData {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Body of the registration form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterFormData {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// `?next=` carried by login redirects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NextQuery {
    #[serde(default)]
    pub next: Option<String>,
}
